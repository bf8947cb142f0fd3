//! Error id generation
#[cfg(any(test, feature = "testing"))]
pub use increment::IncrementErrorIdGenerator;

use rand::{rngs, Rng, SeedableRng};
use std::cell::RefCell;
use std::fmt;

/// Interface for generating `error.id` values.
pub trait ErrorIdGenerator: Send + Sync + fmt::Debug {
    /// Generate a new error id.
    fn new_error_id(&self) -> String;
}

/// Default [`ErrorIdGenerator`] implementation.
///
/// Generates 128 random bits rendered as 32 lowercase hex characters.
#[derive(Clone, Debug, Default)]
pub struct RandomErrorIdGenerator {
    _private: (),
}

impl ErrorIdGenerator for RandomErrorIdGenerator {
    fn new_error_id(&self) -> String {
        let id = CURRENT_RNG.with(|rng| rng.borrow_mut().random::<u128>());
        const_hex::encode(id.to_be_bytes())
    }
}

thread_local! {
    /// Store random number generator for each thread
    static CURRENT_RNG: RefCell<rngs::SmallRng> = RefCell::new(rngs::SmallRng::from_os_rng());
}

#[cfg(any(test, feature = "testing"))]
mod increment {
    use super::ErrorIdGenerator;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// [`ErrorIdGenerator`] implementation that increments a counter for each
    /// new id. This helps produce predictable ids for testing.
    #[derive(Clone, Debug)]
    pub struct IncrementErrorIdGenerator(Arc<AtomicU64>);

    impl IncrementErrorIdGenerator {
        /// Create a new [`IncrementErrorIdGenerator`]
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Default for IncrementErrorIdGenerator {
        fn default() -> Self {
            Self(Arc::new(AtomicU64::new(1)))
        }
    }

    impl ErrorIdGenerator for IncrementErrorIdGenerator {
        fn new_error_id(&self) -> String {
            format!("{:032x}", self.0.fetch_add(1, Ordering::SeqCst))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_are_hex_and_distinct() {
        let generator = RandomErrorIdGenerator::default();
        let first = generator.new_error_id();
        let second = generator.new_error_id();

        assert_eq!(first.len(), 32);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(first, second);
    }

    #[test]
    fn increment_ids_are_predictable() {
        let generator = IncrementErrorIdGenerator::new();
        assert_eq!(generator.new_error_id(), "00000000000000000000000000000001");
        assert_eq!(
            generator.clone().new_error_id(),
            "00000000000000000000000000000002"
        );
    }
}
