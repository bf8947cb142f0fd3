use opentelemetry_proto::tonic::trace::v1::Span;

use super::target::classify;
use super::{duration_us, timestamp_us, Facts};
use crate::attributes;
use crate::attrs::AttributeDelta;
use crate::config::SpanConfig;

pub(crate) fn enrich(span: &Span, facts: &Facts, config: &SpanConfig, delta: &mut AttributeDelta) {
    if config.timestamp_us.enabled {
        delta.put_int(
            attributes::TIMESTAMP_US,
            timestamp_us(span.start_time_unix_nano),
        );
    }
    if config.name.enabled {
        delta.put_str(attributes::SPAN_NAME, span.name.as_str());
    }
    if config.processor_event.enabled {
        delta.put_str(attributes::PROCESSOR_EVENT, "span");
    }
    if config.representative_count.enabled {
        delta.put_double(
            attributes::SPAN_REPRESENTATIVE_COUNT,
            facts.representative_count,
        );
    }

    let needs_target = config.type_subtype.enabled
        || config.service_target.enabled
        || config.destination_service.enabled;
    let classification = needs_target.then(|| classify(span));

    if let Some(classification) = classification.as_ref().filter(|_| config.type_subtype.enabled) {
        delta.put_str(attributes::SPAN_TYPE, classification.span_type);
        if let Some(subtype) = classification.subtype {
            delta.put_str(attributes::SPAN_SUBTYPE, subtype);
        }
    }
    if config.duration_us.enabled {
        delta.put_int(attributes::SPAN_DURATION_US, duration_us(span));
    }
    if config.event_outcome.enabled {
        delta.put_str(attributes::EVENT_OUTCOME, facts.outcome.as_str());
        delta.put_int(
            attributes::SUCCESS_COUNT,
            facts.outcome.success_count(facts.representative_count),
        );
    }
    let Some(classification) = classification else {
        return;
    };
    if config.service_target.enabled && classification.has_target() {
        delta.put_str(attributes::SERVICE_TARGET_TYPE, classification.target_type);
        delta.put_str(
            attributes::SERVICE_TARGET_NAME,
            classification.target_name.unwrap_or_default(),
        );
    }
    if config.destination_service.enabled {
        if let Some(resource) = classification.resource {
            delta.put_str(attributes::SPAN_DESTINATION_SERVICE_RESOURCE, resource);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AttributeConfig;
    use crate::attrs::tests::{int_kv, str_kv};
    use crate::trace::outcome::Outcome;

    fn facts() -> Facts {
        Facts {
            is_transaction: false,
            representative_count: 1.0,
            outcome: Outcome::Success,
        }
    }

    #[test]
    fn only_enabled_groups_are_written() {
        let span = Span {
            parent_span_id: vec![1; 8],
            attributes: vec![
                str_kv("peer.service", "testsvc"),
                int_kv("http.status_code", 200),
            ],
            ..Default::default()
        };
        let config = SpanConfig {
            service_target: AttributeConfig { enabled: true },
            ..Default::default()
        };

        let mut delta = AttributeDelta::default();
        enrich(&span, &facts(), &config, &mut delta);
        let mut attrs = Vec::new();
        delta.merge_into(&mut attrs);

        assert_eq!(
            attrs,
            vec![
                str_kv("service.target.type", "http"),
                str_kv("service.target.name", "testsvc"),
            ]
        );
    }

    #[test]
    fn disabled_config_writes_nothing() {
        let span = Span {
            parent_span_id: vec![1; 8],
            ..Default::default()
        };
        let mut delta = AttributeDelta::default();
        enrich(&span, &facts(), &SpanConfig::default(), &mut delta);
        assert!(delta.is_empty());
    }
}
