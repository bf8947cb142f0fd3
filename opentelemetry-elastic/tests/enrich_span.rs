use opentelemetry_elastic::attributes;
use opentelemetry_elastic::config::Config;
use opentelemetry_elastic::trace::{is_elastic_transaction, Enricher, ErrorIdGenerator};
use opentelemetry_proto::tonic::common::v1::{any_value::Value, AnyValue, KeyValue};
use opentelemetry_proto::tonic::trace::v1::span::{Event, Link, SpanKind};
use opentelemetry_proto::tonic::trace::v1::{
    status::StatusCode, ResourceSpans, ScopeSpans, Span, Status,
};
use std::sync::atomic::{AtomicUsize, Ordering};

const HAS_REMOTE_PARENT_FLAG: u32 = 0x100;
const REMOTE_PARENT_FLAG: u32 = 0x200;

#[derive(Debug, Default)]
struct SequenceIds(AtomicUsize);

impl ErrorIdGenerator for SequenceIds {
    fn new_error_id(&self) -> String {
        format!("error-{}", self.0.fetch_add(1, Ordering::Relaxed))
    }
}

fn enricher() -> Enricher {
    Enricher::builder()
        .with_config(Config::enabled())
        .with_error_id_generator(SequenceIds::default())
        .build()
}

fn kv(key: &str, value: Value) -> KeyValue {
    KeyValue {
        key: key.to_string(),
        value: Some(AnyValue { value: Some(value) }),
    }
}

fn str_kv(key: &str, value: &str) -> KeyValue {
    kv(key, Value::StringValue(value.to_string()))
}

fn get<'a>(attrs: &'a [KeyValue], key: &str) -> Option<&'a Value> {
    attrs
        .iter()
        .find(|kv| kv.key == key)
        .and_then(|kv| kv.value.as_ref())
        .and_then(|value| value.value.as_ref())
}

fn get_str<'a>(attrs: &'a [KeyValue], key: &str) -> Option<&'a str> {
    match get(attrs, key) {
        Some(Value::StringValue(value)) => Some(value),
        _ => None,
    }
}

fn child_span(kind: SpanKind, flags: u32, attributes: Vec<KeyValue>) -> Span {
    Span {
        trace_id: vec![1; 16],
        span_id: vec![2; 8],
        parent_span_id: vec![3; 8],
        kind: kind as i32,
        flags,
        name: "child".to_string(),
        start_time_unix_nano: 1_000_000,
        end_time_unix_nano: 3_000_000,
        attributes,
        ..Default::default()
    }
}

#[test]
fn root_spans_are_transactions() {
    for kind in [SpanKind::Unspecified, SpanKind::Internal, SpanKind::Client, SpanKind::Producer] {
        let mut span = Span {
            span_id: vec![2; 8],
            kind: kind as i32,
            ..Default::default()
        };
        assert!(is_elastic_transaction(&span));

        enricher().enrich_span(&mut span);
        assert_eq!(
            get(&span.attributes, attributes::TRANSACTION_ROOT),
            Some(&Value::BoolValue(true))
        );
        assert_eq!(
            get_str(&span.attributes, attributes::PROCESSOR_EVENT),
            Some("transaction")
        );
    }
}

#[test]
fn remote_parents_make_transactions() {
    for kind in [SpanKind::Internal, SpanKind::Client, SpanKind::Producer] {
        let span = child_span(kind, HAS_REMOTE_PARENT_FLAG | REMOTE_PARENT_FLAG, vec![]);
        assert!(is_elastic_transaction(&span));
    }
}

#[test]
fn local_parents_make_spans() {
    for kind in [SpanKind::Internal, SpanKind::Producer, SpanKind::Unspecified] {
        for flags in [0, HAS_REMOTE_PARENT_FLAG] {
            let mut span = child_span(kind, flags, vec![]);
            assert!(!is_elastic_transaction(&span));

            enricher().enrich_span(&mut span);
            assert_eq!(get_str(&span.attributes, attributes::PROCESSOR_EVENT), Some("span"));
            assert!(get(&span.attributes, attributes::TRANSACTION_ROOT).is_none());
        }
    }
}

#[test]
fn http_transaction() {
    let mut span = child_span(
        SpanKind::Server,
        0,
        vec![kv("http.response.status_code", Value::IntValue(200))],
    );
    span.trace_state = "ot=p:8;".to_string();
    enricher().enrich_span(&mut span);

    let attrs = &span.attributes;
    assert_eq!(get_str(attrs, attributes::TRANSACTION_RESULT), Some("HTTP 2xx"));
    assert_eq!(get_str(attrs, attributes::EVENT_OUTCOME), Some("success"));
    assert_eq!(get_str(attrs, attributes::TRANSACTION_TYPE), Some("request"));
    assert_eq!(
        get(attrs, attributes::TRANSACTION_REPRESENTATIVE_COUNT),
        Some(&Value::DoubleValue(256.0))
    );
    assert_eq!(
        get(attrs, attributes::TRANSACTION_DURATION_US),
        Some(&Value::IntValue(2_000))
    );
}

#[test]
fn span_status_decides_outcome_but_not_result() {
    let mut span = child_span(
        SpanKind::Server,
        0,
        vec![kv("http.response.status_code", Value::IntValue(500))],
    );
    span.status = Some(Status {
        code: StatusCode::Ok as i32,
        ..Default::default()
    });
    enricher().enrich_span(&mut span);

    assert_eq!(get_str(&span.attributes, attributes::TRANSACTION_RESULT), Some("HTTP 5xx"));
    assert_eq!(get_str(&span.attributes, attributes::EVENT_OUTCOME), Some("success"));
}

#[test]
fn database_over_http_keeps_the_http_target() {
    let http_attributes = vec![
        str_kv("url.full", "https://es.example.com:9200/_search"),
        str_kv("peer.service", "search"),
    ];
    let mut http = child_span(SpanKind::Client, 0, http_attributes.clone());
    let mut db = child_span(
        SpanKind::Client,
        0,
        [str_kv("db.system", "elasticsearch")]
            .into_iter()
            .chain(http_attributes)
            .collect(),
    );
    let enricher = enricher();
    enricher.enrich_span(&mut http);
    enricher.enrich_span(&mut db);

    assert_eq!(get_str(&db.attributes, attributes::SPAN_TYPE), Some("db"));
    assert_eq!(get_str(&db.attributes, attributes::SPAN_SUBTYPE), Some("elasticsearch"));
    for key in [
        attributes::SERVICE_TARGET_NAME,
        attributes::SPAN_DESTINATION_SERVICE_RESOURCE,
    ] {
        assert!(get_str(&db.attributes, key).is_some());
        assert_eq!(get_str(&db.attributes, key), get_str(&http.attributes, key));
    }
}

#[test]
fn child_links_are_collected() {
    let link = |id: u8, attributes: Vec<KeyValue>| Link {
        trace_id: vec![1; 16],
        span_id: vec![id; 8],
        attributes,
        ..Default::default()
    };
    let mut span = child_span(SpanKind::Server, 0, vec![]);
    span.links = vec![
        link(0xaa, vec![kv("is_child", Value::BoolValue(true))]),
        link(0xbb, vec![]),
        link(0xcc, vec![kv("elastic.is_child", Value::BoolValue(true))]),
    ];
    enricher().enrich_span(&mut span);

    assert_eq!(span.links.len(), 1);
    assert_eq!(span.links[0].span_id, vec![0xbb; 8]);
    let child_ids = match get(&span.attributes, attributes::CHILD_IDS) {
        Some(Value::ArrayValue(array)) => array
            .values
            .iter()
            .filter_map(|value| match &value.value {
                Some(Value::StringValue(id)) => Some(id.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>(),
        other => panic!("unexpected child ids {other:?}"),
    };
    assert_eq!(child_ids, vec!["aaaaaaaaaaaaaaaa", "cccccccccccccccc"]);
}

#[test]
fn exceptions_of_the_same_type_share_a_grouping_key() {
    let exception = |message: &str| Event {
        name: "exception".to_string(),
        time_unix_nano: 2_000_000,
        attributes: vec![
            str_kv("exception.type", "java.net.ConnectException"),
            str_kv("exception.message", message),
        ],
        ..Default::default()
    };
    let mut span = child_span(SpanKind::Server, 0, vec![]);
    span.events = vec![exception("connection refused"), exception("connection reset")];
    enricher().enrich_span(&mut span);

    let [first, second] = &span.events[..] else {
        panic!("expected two events");
    };
    assert_eq!(
        get_str(&first.attributes, attributes::ERROR_GROUPING_KEY),
        get_str(&second.attributes, attributes::ERROR_GROUPING_KEY)
    );
    assert_eq!(
        get_str(&first.attributes, attributes::ERROR_GROUPING_NAME),
        Some("connection refused")
    );
    assert_eq!(
        get_str(&second.attributes, attributes::ERROR_GROUPING_NAME),
        Some("connection reset")
    );
    assert_eq!(get_str(&first.attributes, attributes::ERROR_ID), Some("error-0"));
    assert_eq!(get_str(&second.attributes, attributes::ERROR_ID), Some("error-1"));
    assert_eq!(
        get_str(&first.attributes, attributes::TRANSACTION_TYPE),
        Some("unknown")
    );
}

#[test]
fn every_span_of_a_batch_is_enriched() {
    let mut batch = vec![ResourceSpans {
        scope_spans: vec![
            ScopeSpans {
                spans: vec![child_span(SpanKind::Server, 0, vec![])],
                ..Default::default()
            },
            ScopeSpans {
                spans: vec![child_span(SpanKind::Internal, 0, vec![])],
                ..Default::default()
            },
        ],
        ..Default::default()
    }];
    enricher().enrich_resource_spans(&mut batch);

    let events: Vec<_> = batch[0]
        .scope_spans
        .iter()
        .flat_map(|scope| &scope.spans)
        .map(|span| get_str(&span.attributes, attributes::PROCESSOR_EVENT))
        .collect();
    assert_eq!(events, vec![Some("transaction"), Some("span")]);
}

#[test]
fn default_config_leaves_spans_untouched() {
    let mut span = child_span(SpanKind::Server, 0, vec![str_kv("http.route", "/users")]);
    let before = span.clone();
    Enricher::new(Config::default()).enrich_span(&mut span);
    assert_eq!(span, before);
}
