//! Span event enrichment. Events named `exception` become error records.
use opentelemetry_proto::tonic::trace::v1::span::Event;

use super::id_generator::ErrorIdGenerator;
use super::timestamp_us;
use crate::attributes::{self, semconv};
use crate::attrs::{contains, get_raw_str, AttributeDelta};
use crate::config::SpanEventConfig;

const EXCEPTION_EVENT_NAME: &str = "exception";

fn is_exception(event: &Event) -> bool {
    event.name == EXCEPTION_EVENT_NAME
        && [
            semconv::EXCEPTION_TYPE,
            semconv::EXCEPTION_MESSAGE,
            semconv::EXCEPTION_STACKTRACE,
        ]
        .iter()
        .any(|key| contains(&event.attributes, key))
}

/// Lowercase hex MD5 digest of the exception type.
pub(crate) fn grouping_key(exception_type: &str) -> String {
    format!("{:x}", md5::compute(exception_type.as_bytes()))
}

/// Derives the attributes of one event. `transaction_type` is set when the
/// owning span is a transaction.
pub(crate) fn enrich_event(
    event: &Event,
    config: &SpanEventConfig,
    transaction_type: Option<&str>,
    ids: &dyn ErrorIdGenerator,
) -> AttributeDelta {
    let mut delta = AttributeDelta::default();
    if config.timestamp_us.enabled {
        delta.put_int(attributes::TIMESTAMP_US, timestamp_us(event.time_unix_nano));
    }
    if !is_exception(event) {
        return delta;
    }

    if config.processor_event.enabled {
        delta.put_str(attributes::PROCESSOR_EVENT, "error");
    }
    if config.error_exception_handled.enabled {
        delta.put_bool(attributes::ERROR_EXCEPTION_HANDLED, true);
    }
    if config.error_id.enabled {
        delta.put_str(attributes::ERROR_ID, ids.new_error_id());
    }
    if config.error_grouping_key.enabled {
        if let Some(exception_type) = get_raw_str(&event.attributes, semconv::EXCEPTION_TYPE) {
            delta.put_str(attributes::ERROR_GROUPING_KEY, grouping_key(exception_type));
        }
    }
    if config.error_grouping_name.enabled {
        if let Some(message) = get_raw_str(&event.attributes, semconv::EXCEPTION_MESSAGE) {
            delta.put_str(attributes::ERROR_GROUPING_NAME, message);
        }
    }
    if let Some(transaction_type) = transaction_type {
        if config.transaction_sampled.enabled {
            delta.put_bool(attributes::TRANSACTION_SAMPLED, true);
        }
        if config.transaction_type.enabled {
            delta.put_str(attributes::TRANSACTION_TYPE, transaction_type);
        }
    }
    delta
}
