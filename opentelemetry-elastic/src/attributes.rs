//! # Attribute keys
//!
//! Keys of the attributes written by the enrichment pass, followed by the
//! semantic-convention keys it reads.

/// Discriminates the kind of Elastic document a span or event becomes:
/// `transaction`, `span` or `error`.
pub const PROCESSOR_EVENT: &str = "processor.event";
/// Start time of the span, or time of the event, in microseconds.
pub const TIMESTAMP_US: &str = "timestamp.us";
/// `success`, `failure` or `unknown`.
pub const EVENT_OUTCOME: &str = "event.outcome";
/// Number of successful occurrences represented by the span.
pub const SUCCESS_COUNT: &str = "event.success_count";

/// Hex encoded span id of the transaction.
pub const TRANSACTION_ID: &str = "transaction.id";
/// Name of the transaction.
pub const TRANSACTION_NAME: &str = "transaction.name";
/// Whether the transaction was sampled.
pub const TRANSACTION_SAMPLED: &str = "transaction.sampled";
/// Whether the transaction is the root of its trace.
pub const TRANSACTION_ROOT: &str = "transaction.root";
/// `request`, `messaging` or `unknown`.
pub const TRANSACTION_TYPE: &str = "transaction.type";
/// Human readable result, e.g. `HTTP 2xx`.
pub const TRANSACTION_RESULT: &str = "transaction.result";
/// Duration of the transaction in microseconds.
pub const TRANSACTION_DURATION_US: &str = "transaction.duration.us";
/// Inverse sampling probability of the transaction.
pub const TRANSACTION_REPRESENTATIVE_COUNT: &str = "transaction.representative_count";

/// Name of the span.
pub const SPAN_NAME: &str = "span.name";
/// Type of the span, e.g. `db` or `external`.
pub const SPAN_TYPE: &str = "span.type";
/// Subtype of the span, e.g. `elasticsearch` or `http`.
pub const SPAN_SUBTYPE: &str = "span.subtype";
/// Duration of the span in microseconds.
pub const SPAN_DURATION_US: &str = "span.duration.us";
/// Inverse sampling probability of the span.
pub const SPAN_REPRESENTATIVE_COUNT: &str = "span.representative_count";
/// Resource identifying the downstream destination of the span.
pub const SPAN_DESTINATION_SERVICE_RESOURCE: &str = "span.destination.service.resource";
/// Hex encoded ids of the spans inferred as children of the span.
pub const CHILD_IDS: &str = "span.links.child.id";

/// Type of the downstream service targeted by the span.
pub const SERVICE_TARGET_TYPE: &str = "service.target.type";
/// Name of the downstream service targeted by the span.
pub const SERVICE_TARGET_NAME: &str = "service.target.name";

/// Unique id of an error record.
pub const ERROR_ID: &str = "error.id";
/// Whether the exception was handled.
pub const ERROR_EXCEPTION_HANDLED: &str = "error.exception.handled";
/// Hash grouping equivalent errors together.
pub const ERROR_GROUPING_KEY: &str = "error.grouping_key";
/// Display name of the error group.
pub const ERROR_GROUPING_NAME: &str = "error.grouping_name";

/// Marks a data point produced by a remapper.
pub const OTEL_REMAPPED: &str = "otel_remapped";
/// Target dataset of a remapped data point.
pub const DATA_STREAM_DATASET: &str = "data_stream.dataset";

/// Semantic-convention keys read by the enrichment pass.
///
/// Stable keys come from `opentelemetry-semantic-conventions`. Keys that are
/// experimental or deprecated there are pinned here, since spans produced
/// by older instrumentations still carry them.
pub(crate) mod semconv {
    pub(crate) use opentelemetry_semantic_conventions::attribute::{
        EXCEPTION_MESSAGE, EXCEPTION_STACKTRACE, EXCEPTION_TYPE, HTTP_RESPONSE_STATUS_CODE,
        SERVER_ADDRESS, SERVER_PORT, URL_FULL,
    };

    pub(crate) const HTTP_STATUS_CODE: &str = "http.status_code";
    pub(crate) const HTTP_URL: &str = "http.url";
    pub(crate) const URL_DOMAIN: &str = "url.domain";
    pub(crate) const URL_PORT: &str = "url.port";
    pub(crate) const NET_PEER_NAME: &str = "net.peer.name";
    pub(crate) const NET_PEER_PORT: &str = "net.peer.port";
    pub(crate) const PEER_SERVICE: &str = "peer.service";

    pub(crate) const RPC_SYSTEM: &str = "rpc.system";
    pub(crate) const RPC_SERVICE: &str = "rpc.service";
    pub(crate) const RPC_GRPC_STATUS_CODE: &str = "rpc.grpc.status_code";

    pub(crate) const MESSAGING_SYSTEM: &str = "messaging.system";
    pub(crate) const MESSAGING_DESTINATION_NAME: &str = "messaging.destination.name";
    pub(crate) const MESSAGING_DESTINATION_TEMPORARY: &str = "messaging.destination.temporary";

    pub(crate) const DB_SYSTEM: &str = "db.system";
    pub(crate) const DB_NAME: &str = "db.name";

    pub(crate) const GEN_AI_SYSTEM: &str = "gen_ai.system";

    /// Link attributes marking the linked span as an inferred child.
    pub(crate) const LINK_IS_CHILD: &str = "is_child";
    pub(crate) const LINK_ELASTIC_IS_CHILD: &str = "elastic.is_child";
}
