//! # Enrichment Configuration
//!
//! Each enrichment facet (transaction, span, span event) is a set of
//! independent [`AttributeConfig`] toggles, one per derived attribute group.
//! The [`Default`] configuration disables everything, which makes
//! enrichment a no-op; [`Config::enabled`] turns every toggle on.
//!
//! With the `serde` feature the configuration can be deserialized from a
//! partial document: toggles that are not mentioned stay disabled.
#[cfg(feature = "serde")]
use serde::Deserialize;

/// Enrichment configuration for a span, its events and its links.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Enrichment of spans classified as transactions.
    pub transaction: TransactionConfig,
    /// Enrichment of spans classified as (non transaction) spans.
    pub span: SpanConfig,
    /// Enrichment of span events.
    pub span_event: SpanEventConfig,
}

impl Config {
    /// A configuration with every enrichment enabled.
    pub fn enabled() -> Self {
        Config {
            transaction: TransactionConfig::enabled(),
            span: SpanConfig::enabled(),
            span_event: SpanEventConfig::enabled(),
        }
    }

    /// Whether any enrichment facet is enabled.
    pub fn is_enabled(&self) -> bool {
        self.transaction.is_enabled() || self.span.is_enabled() || self.span_event.is_enabled()
    }
}

/// Toggle for a single attribute group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttributeConfig {
    /// Whether the attribute group is written.
    pub enabled: bool,
}

impl AttributeConfig {
    const ON: AttributeConfig = AttributeConfig { enabled: true };
}

/// Attributes written on transactions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransactionConfig {
    /// `timestamp.us`
    pub timestamp_us: AttributeConfig,
    /// `transaction.sampled`
    pub sampled: AttributeConfig,
    /// `transaction.id`
    pub id: AttributeConfig,
    /// `transaction.root`
    pub root: AttributeConfig,
    /// `transaction.name`
    pub name: AttributeConfig,
    /// `processor.event`
    pub processor_event: AttributeConfig,
    /// `transaction.representative_count`
    pub representative_count: AttributeConfig,
    /// `transaction.duration.us`
    pub duration_us: AttributeConfig,
    /// `transaction.type`
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_: AttributeConfig,
    /// `transaction.result`
    pub result: AttributeConfig,
    /// `event.outcome` and `event.success_count`
    pub event_outcome: AttributeConfig,
    /// `span.links.child.id`, removing child links from the span.
    pub inferred_spans: AttributeConfig,
}

impl TransactionConfig {
    /// A transaction configuration with every attribute enabled.
    pub fn enabled() -> Self {
        TransactionConfig {
            timestamp_us: AttributeConfig::ON,
            sampled: AttributeConfig::ON,
            id: AttributeConfig::ON,
            root: AttributeConfig::ON,
            name: AttributeConfig::ON,
            processor_event: AttributeConfig::ON,
            representative_count: AttributeConfig::ON,
            duration_us: AttributeConfig::ON,
            type_: AttributeConfig::ON,
            result: AttributeConfig::ON,
            event_outcome: AttributeConfig::ON,
            inferred_spans: AttributeConfig::ON,
        }
    }

    /// Whether any transaction attribute is enabled.
    pub fn is_enabled(&self) -> bool {
        [
            self.timestamp_us,
            self.sampled,
            self.id,
            self.root,
            self.name,
            self.processor_event,
            self.representative_count,
            self.duration_us,
            self.type_,
            self.result,
            self.event_outcome,
            self.inferred_spans,
        ]
        .iter()
        .any(|attr| attr.enabled)
    }
}

/// Attributes written on spans.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpanConfig {
    /// `timestamp.us`
    pub timestamp_us: AttributeConfig,
    /// `span.name`
    pub name: AttributeConfig,
    /// `processor.event`
    pub processor_event: AttributeConfig,
    /// `span.representative_count`
    pub representative_count: AttributeConfig,
    /// `span.type` and `span.subtype`
    pub type_subtype: AttributeConfig,
    /// `span.duration.us`
    pub duration_us: AttributeConfig,
    /// `event.outcome` and `event.success_count`
    pub event_outcome: AttributeConfig,
    /// `service.target.type` and `service.target.name`
    pub service_target: AttributeConfig,
    /// `span.destination.service.resource`
    pub destination_service: AttributeConfig,
    /// `span.links.child.id`, removing child links from the span.
    pub inferred_spans: AttributeConfig,
}

impl SpanConfig {
    /// A span configuration with every attribute enabled.
    pub fn enabled() -> Self {
        SpanConfig {
            timestamp_us: AttributeConfig::ON,
            name: AttributeConfig::ON,
            processor_event: AttributeConfig::ON,
            representative_count: AttributeConfig::ON,
            type_subtype: AttributeConfig::ON,
            duration_us: AttributeConfig::ON,
            event_outcome: AttributeConfig::ON,
            service_target: AttributeConfig::ON,
            destination_service: AttributeConfig::ON,
            inferred_spans: AttributeConfig::ON,
        }
    }

    /// Whether any span attribute is enabled.
    pub fn is_enabled(&self) -> bool {
        [
            self.timestamp_us,
            self.name,
            self.processor_event,
            self.representative_count,
            self.type_subtype,
            self.duration_us,
            self.event_outcome,
            self.service_target,
            self.destination_service,
            self.inferred_spans,
        ]
        .iter()
        .any(|attr| attr.enabled)
    }
}

/// Attributes written on span events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpanEventConfig {
    /// `timestamp.us`, written on every event.
    pub timestamp_us: AttributeConfig,
    /// `transaction.sampled`, copied from the owning transaction.
    pub transaction_sampled: AttributeConfig,
    /// `transaction.type`, copied from the owning transaction.
    pub transaction_type: AttributeConfig,
    /// `processor.event` on exceptions.
    pub processor_event: AttributeConfig,
    /// `error.id`
    pub error_id: AttributeConfig,
    /// `error.exception.handled`
    pub error_exception_handled: AttributeConfig,
    /// `error.grouping_key`
    pub error_grouping_key: AttributeConfig,
    /// `error.grouping_name`
    pub error_grouping_name: AttributeConfig,
}

impl SpanEventConfig {
    /// A span event configuration with every attribute enabled.
    pub fn enabled() -> Self {
        SpanEventConfig {
            timestamp_us: AttributeConfig::ON,
            transaction_sampled: AttributeConfig::ON,
            transaction_type: AttributeConfig::ON,
            processor_event: AttributeConfig::ON,
            error_id: AttributeConfig::ON,
            error_exception_handled: AttributeConfig::ON,
            error_grouping_key: AttributeConfig::ON,
            error_grouping_name: AttributeConfig::ON,
        }
    }

    /// Whether any span event attribute is enabled.
    pub fn is_enabled(&self) -> bool {
        [
            self.timestamp_us,
            self.transaction_sampled,
            self.transaction_type,
            self.processor_event,
            self.error_id,
            self.error_exception_handled,
            self.error_grouping_key,
            self.error_grouping_name,
        ]
        .iter()
        .any(|attr| attr.enabled)
    }
}
