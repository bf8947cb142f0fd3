//! # Trace Enrichment
//!
//! Derives Elastic APM attributes for OTLP spans and their events.
//!
//! A span is first classified with [`is_elastic_transaction`]. Transactions
//! receive `transaction.*` attributes, every other span receives `span.*`
//! attributes along with its service target. Span events named `exception`
//! are turned into error records. Links flagged with `is_child` or
//! `elastic.is_child` are removed from the span and their span ids are
//! recorded under `span.links.child.id`.
//!
//! Every value is computed from the span as it was handed in: derived
//! attributes are collected first and merged into the span once all of them
//! are known, so no derivation observes another one's output.
//!
//! ```
//! use opentelemetry_elastic::config::Config;
//! use opentelemetry_elastic::trace::{Enricher, RandomErrorIdGenerator};
//! use opentelemetry_proto::tonic::common::v1::{any_value::Value, AnyValue, KeyValue};
//! use opentelemetry_proto::tonic::trace::v1::{span::Event, Span};
//!
//! let enricher = Enricher::builder()
//!     .with_config(Config::enabled())
//!     .with_error_id_generator(RandomErrorIdGenerator::default())
//!     .build();
//!
//! let mut span = Span {
//!     name: "GET /users".into(),
//!     events: vec![Event {
//!         name: "exception".into(),
//!         attributes: vec![KeyValue {
//!             key: "exception.type".into(),
//!             value: Some(AnyValue {
//!                 value: Some(Value::StringValue("java.lang.Error".into())),
//!             }),
//!         }],
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//! enricher.enrich_span(&mut span);
//!
//! assert!(span.events[0].attributes.iter().any(|kv| kv.key == "error.id"));
//! ```
use opentelemetry::otel_debug;
use opentelemetry_proto::tonic::trace::v1::{ResourceSpans, Span};

use crate::attributes;
use crate::attrs::AttributeDelta;
use crate::config::Config;

mod exception;
mod id_generator;
mod links;
mod outcome;
mod span;
mod target;
mod tracestate;
mod transaction;

#[cfg(any(test, feature = "testing"))]
pub use id_generator::IncrementErrorIdGenerator;
pub use id_generator::{ErrorIdGenerator, RandomErrorIdGenerator};
pub use transaction::is_elastic_transaction;

use outcome::Outcome;

/// Enrich `span` in place according to `config`, generating error ids with
/// [`RandomErrorIdGenerator`].
///
/// Use an [`Enricher`] to supply a different [`ErrorIdGenerator`].
pub fn enrich_span(span: &mut Span, config: &Config) {
    enrich(span, config, &RandomErrorIdGenerator::default());
}

/// Enriches spans with a fixed [`Config`] and [`ErrorIdGenerator`].
///
/// An `Enricher` holds no per-span state and can be shared between threads.
#[derive(Debug)]
pub struct Enricher {
    config: Config,
    error_id_generator: Box<dyn ErrorIdGenerator>,
}

impl Enricher {
    /// Create an enricher with the given configuration and a
    /// [`RandomErrorIdGenerator`].
    pub fn new(config: Config) -> Self {
        Enricher {
            config,
            error_id_generator: Box::new(RandomErrorIdGenerator::default()),
        }
    }

    /// Create a new [`EnricherBuilder`].
    pub fn builder() -> EnricherBuilder {
        EnricherBuilder::default()
    }

    /// The configuration used by this enricher.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Enrich a single span, its events and its links.
    pub fn enrich_span(&self, span: &mut Span) {
        enrich(span, &self.config, self.error_id_generator.as_ref());
    }

    /// Enrich every span of every scope in `resource_spans`.
    pub fn enrich_resource_spans(&self, resource_spans: &mut [ResourceSpans]) {
        resource_spans
            .iter_mut()
            .flat_map(|rs| rs.scope_spans.iter_mut())
            .flat_map(|ss| ss.spans.iter_mut())
            .for_each(|span| self.enrich_span(span));
    }
}

/// Builder for [`Enricher`].
#[derive(Debug, Default)]
pub struct EnricherBuilder {
    config: Option<Config>,
    error_id_generator: Option<Box<dyn ErrorIdGenerator>>,
}

impl EnricherBuilder {
    /// The enrichment configuration. Defaults to [`Config::enabled`].
    pub fn with_config(self, config: Config) -> Self {
        EnricherBuilder {
            config: Some(config),
            ..self
        }
    }

    /// The generator used for `error.id`. Defaults to
    /// [`RandomErrorIdGenerator`].
    pub fn with_error_id_generator<G: ErrorIdGenerator + 'static>(self, generator: G) -> Self {
        EnricherBuilder {
            error_id_generator: Some(Box::new(generator)),
            ..self
        }
    }

    /// Create the [`Enricher`].
    pub fn build(self) -> Enricher {
        Enricher {
            config: self.config.unwrap_or_else(Config::enabled),
            error_id_generator: self
                .error_id_generator
                .unwrap_or_else(|| Box::new(RandomErrorIdGenerator::default())),
        }
    }
}

/// Values shared by the transaction, span and event derivations, computed
/// once per span.
#[derive(Debug)]
pub(crate) struct Facts {
    pub(crate) is_transaction: bool,
    pub(crate) representative_count: f64,
    pub(crate) outcome: Outcome,
}

impl Facts {
    fn of(span: &Span) -> Self {
        Facts {
            is_transaction: is_elastic_transaction(span),
            representative_count: tracestate::representative_count(&span.trace_state),
            outcome: outcome::outcome(span),
        }
    }
}

fn enrich(span: &mut Span, config: &Config, ids: &dyn ErrorIdGenerator) {
    if !config.is_enabled() {
        otel_debug!(name: "Enrichment.Span.Skipped");
        return;
    }

    let facts = Facts::of(span);
    let mut delta = AttributeDelta::default();
    let infer_children = if facts.is_transaction {
        if config.transaction.is_enabled() {
            transaction::enrich(span, &facts, &config.transaction, &mut delta);
        }
        config.transaction.inferred_spans.enabled
    } else {
        if config.span.is_enabled() {
            span::enrich(span, &facts, &config.span, &mut delta);
        }
        config.span.inferred_spans.enabled
    };

    let event_deltas: Vec<AttributeDelta> = if config.span_event.is_enabled() {
        let transaction_type = facts
            .is_transaction
            .then(|| transaction::transaction_type(&span.attributes));
        span.events
            .iter()
            .map(|event| exception::enrich_event(event, &config.span_event, transaction_type, ids))
            .collect()
    } else {
        Vec::new()
    };

    if infer_children {
        let children = links::take_children(&mut span.links);
        if !children.is_empty() {
            delta.put_str_array(attributes::CHILD_IDS, children);
        }
    }
    delta.merge_into(&mut span.attributes);
    for (event, delta) in span.events.iter_mut().zip(event_deltas) {
        if !delta.is_empty() {
            delta.merge_into(&mut event.attributes);
        }
    }
}

fn timestamp_us(unix_nano: u64) -> i64 {
    (unix_nano / 1_000) as i64
}

fn duration_us(span: &Span) -> i64 {
    timestamp_us(span.end_time_unix_nano.saturating_sub(span.start_time_unix_nano))
}

fn is_zero_id(id: &[u8]) -> bool {
    id.iter().all(|b| *b == 0)
}

/// Hex encoded span id. Empty and all-zero ids encode to `""`.
fn hex_id(id: &[u8]) -> String {
    if is_zero_id(id) {
        String::new()
    } else {
        const_hex::encode(id)
    }
}
