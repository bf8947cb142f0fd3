/// Errors raised while deriving a single enrichment field.
///
/// Enrichment itself never fails: every error is turned into the documented
/// default of the field it was computed for.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The `ot` entry of the trace state could not be parsed.
    #[error("invalid trace state entry: {0}")]
    InvalidTraceState(String),

    /// The sampling p-value is outside of `0..=63`.
    #[error("p-value {0} is out of range")]
    PValueOutOfRange(u32),

    /// A URL attribute could not be parsed.
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    /// A URL attribute was parsed but does not name a host.
    #[error("url has no host: {0}")]
    MissingHost(String),
}
