//! Outcome and result derivation.
//!
//! An explicit span status decides the outcome. The result label prefers the
//! protocol status attributes, so a span with status `Ok` and an HTTP 500
//! response is a success labelled `HTTP 5xx`.
use std::borrow::Cow;

use opentelemetry_proto::tonic::common::v1::KeyValue;
use opentelemetry_proto::tonic::trace::v1::{status::StatusCode, Span};

use crate::attributes::semconv;
use crate::attrs::get_int;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Success,
    Failure,
}

const MAX_SUCCESS_COUNT: f64 = (1u64 << 62) as f64;

impl Outcome {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }

    /// `event.success_count` for a span representing `representative_count`
    /// occurrences.
    ///
    /// Counts above `2^62`, the largest power of two an `i64` holds, are
    /// clamped to `2^62`.
    pub(crate) fn success_count(self, representative_count: f64) -> i64 {
        match self {
            Outcome::Success => representative_count.min(MAX_SUCCESS_COUNT) as i64,
            Outcome::Failure => 0,
        }
    }
}

/// HTTP response status code, preferring the current key over `http.status_code`.
pub(crate) fn http_status(attrs: &[KeyValue]) -> Option<i64> {
    get_int(attrs, semconv::HTTP_RESPONSE_STATUS_CODE)
        .or_else(|| get_int(attrs, semconv::HTTP_STATUS_CODE))
}

pub(crate) fn grpc_status(attrs: &[KeyValue]) -> Option<i64> {
    get_int(attrs, semconv::RPC_GRPC_STATUS_CODE)
}

pub(crate) fn status_code(span: &Span) -> StatusCode {
    span.status
        .as_ref()
        .and_then(|status| StatusCode::try_from(status.code).ok())
        .unwrap_or(StatusCode::Unset)
}

pub(crate) fn outcome(span: &Span) -> Outcome {
    match status_code(span) {
        StatusCode::Error => Outcome::Failure,
        StatusCode::Ok => Outcome::Success,
        StatusCode::Unset => outcome_from_attributes(&span.attributes),
    }
}

fn outcome_from_attributes(attrs: &[KeyValue]) -> Outcome {
    match http_status(attrs) {
        Some(code) if (100..400).contains(&code) => return Outcome::Success,
        Some(code) if code >= 400 => return Outcome::Failure,
        _ => {}
    }
    match grpc_status(attrs) {
        Some(0) | None => Outcome::Success,
        Some(_) => Outcome::Failure,
    }
}

/// Human readable `transaction.result`.
pub(crate) fn transaction_result(span: &Span) -> Cow<'static, str> {
    match http_status(&span.attributes) {
        Some(code) if (100..600).contains(&code) => {
            return Cow::Owned(format!("HTTP {}xx", code / 100))
        }
        Some(code) if code > 0 => return Cow::Owned(format!("HTTP {code}")),
        _ => {}
    }
    if let Some(code) = grpc_status(&span.attributes) {
        return grpc_code_name(code);
    }
    match status_code(span) {
        StatusCode::Error => Cow::Borrowed("Error"),
        _ => Cow::Borrowed("Success"),
    }
}

fn grpc_code_name(code: i64) -> Cow<'static, str> {
    let name = match code {
        0 => "OK",
        1 => "Canceled",
        2 => "Unknown",
        3 => "InvalidArgument",
        4 => "DeadlineExceeded",
        5 => "NotFound",
        6 => "AlreadyExists",
        7 => "PermissionDenied",
        8 => "ResourceExhausted",
        9 => "FailedPrecondition",
        10 => "Aborted",
        11 => "OutOfRange",
        12 => "Unimplemented",
        13 => "Internal",
        14 => "Unavailable",
        15 => "DataLoss",
        16 => "Unauthenticated",
        other => return Cow::Owned(format!("Code({other})")),
    };
    Cow::Borrowed(name)
}
