use opentelemetry_proto::tonic::common::v1::KeyValue;
use opentelemetry_proto::tonic::trace::v1::{span::SpanKind, Span};

use super::outcome::{grpc_status, http_status, transaction_result};
use super::{duration_us, hex_id, is_zero_id, timestamp_us, Facts};
use crate::attributes::{self, semconv};
use crate::attrs::{contains, AttributeDelta};
use crate::config::TransactionConfig;

const CONTEXT_HAS_IS_REMOTE_MASK: u32 = 0x0000_0100;
const CONTEXT_IS_REMOTE_MASK: u32 = 0x0000_0200;

/// Whether `span` is a service entry point.
///
/// A span is a transaction when it has no parent, when its parent is
/// flagged as remote, or, if the remote flag is unknown, when it is a
/// server or consumer span.
pub fn is_elastic_transaction(span: &Span) -> bool {
    if is_zero_id(&span.parent_span_id) {
        return true;
    }
    if span.flags & CONTEXT_HAS_IS_REMOTE_MASK == 0 {
        return matches!(
            SpanKind::try_from(span.kind),
            Ok(SpanKind::Server | SpanKind::Consumer)
        );
    }
    span.flags & CONTEXT_IS_REMOTE_MASK != 0
}

pub(crate) fn transaction_type(attrs: &[KeyValue]) -> &'static str {
    if http_status(attrs).is_some() {
        "request"
    } else if contains(attrs, semconv::MESSAGING_SYSTEM) {
        "messaging"
    } else if grpc_status(attrs).is_some() {
        "request"
    } else {
        "unknown"
    }
}

pub(crate) fn enrich(
    span: &Span,
    facts: &Facts,
    config: &TransactionConfig,
    delta: &mut AttributeDelta,
) {
    if config.timestamp_us.enabled {
        delta.put_int(
            attributes::TIMESTAMP_US,
            timestamp_us(span.start_time_unix_nano),
        );
    }
    if config.sampled.enabled {
        delta.put_bool(attributes::TRANSACTION_SAMPLED, true);
    }
    if config.id.enabled {
        delta.put_str(attributes::TRANSACTION_ID, hex_id(&span.span_id));
    }
    if config.root.enabled {
        delta.put_bool(
            attributes::TRANSACTION_ROOT,
            is_zero_id(&span.parent_span_id),
        );
    }
    if config.name.enabled {
        delta.put_str(attributes::TRANSACTION_NAME, span.name.as_str());
    }
    if config.processor_event.enabled {
        delta.put_str(attributes::PROCESSOR_EVENT, "transaction");
    }
    if config.representative_count.enabled {
        delta.put_double(
            attributes::TRANSACTION_REPRESENTATIVE_COUNT,
            facts.representative_count,
        );
    }
    if config.duration_us.enabled {
        delta.put_int(attributes::TRANSACTION_DURATION_US, duration_us(span));
    }
    if config.type_.enabled {
        delta.put_str(
            attributes::TRANSACTION_TYPE,
            transaction_type(&span.attributes),
        );
    }
    if config.result.enabled {
        delta.put_str(attributes::TRANSACTION_RESULT, transaction_result(span));
    }
    if config.event_outcome.enabled {
        delta.put_str(attributes::EVENT_OUTCOME, facts.outcome.as_str());
        delta.put_int(
            attributes::SUCCESS_COUNT,
            facts.outcome.success_count(facts.representative_count),
        );
    }
}
