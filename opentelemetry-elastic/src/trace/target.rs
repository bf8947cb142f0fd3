//! Span type, subtype and service target resolution.
//!
//! Each semantic-convention family is a [`Category`] produced by a matcher in
//! [`RULES`]. The first category that matches decides the span type and
//! subtype. The service target comes from the first matching protocol family
//! (HTTP, RPC, messaging), or from the database when no protocol matched, and
//! falls back to `peer.service`.
use std::borrow::Cow;

use opentelemetry::otel_debug;
use opentelemetry_proto::tonic::common::v1::KeyValue;
use opentelemetry_proto::tonic::trace::v1::{span::SpanKind, Span};
use url::Url;

use super::outcome::{grpc_status, http_status};
use crate::Error;
use crate::attributes::semconv;
use crate::attrs::{contains, get_bool, get_int, get_str};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Category<'a> {
    Database { system: &'a str },
    Http,
    Rpc { subtype: Option<&'a str> },
    Messaging { system: Option<&'a str> },
    GenAi { system: &'a str },
}

impl Category<'_> {
    fn is_protocol(&self) -> bool {
        matches!(
            self,
            Category::Http | Category::Rpc { .. } | Category::Messaging { .. }
        )
    }
}

type Matcher = for<'a> fn(&'a [KeyValue]) -> Option<Category<'a>>;

/// Matchers in precedence order.
const RULES: [Matcher; 5] = [database, http, rpc, messaging, gen_ai];

fn database(attrs: &[KeyValue]) -> Option<Category<'_>> {
    get_str(attrs, semconv::DB_SYSTEM).map(|system| Category::Database { system })
}

fn http(attrs: &[KeyValue]) -> Option<Category<'_>> {
    let matched = http_status(attrs).is_some()
        || contains(attrs, semconv::URL_FULL)
        || contains(attrs, semconv::HTTP_URL);
    matched.then_some(Category::Http)
}

fn rpc(attrs: &[KeyValue]) -> Option<Category<'_>> {
    if grpc_status(attrs).is_some() {
        return Some(Category::Rpc {
            subtype: Some("grpc"),
        });
    }
    let system = get_str(attrs, semconv::RPC_SYSTEM);
    if system.is_some() || contains(attrs, semconv::RPC_SERVICE) {
        return Some(Category::Rpc { subtype: system });
    }
    None
}

fn messaging(attrs: &[KeyValue]) -> Option<Category<'_>> {
    let system = get_str(attrs, semconv::MESSAGING_SYSTEM);
    if system.is_some() || contains(attrs, semconv::MESSAGING_DESTINATION_NAME) {
        return Some(Category::Messaging { system });
    }
    None
}

fn gen_ai(attrs: &[KeyValue]) -> Option<Category<'_>> {
    get_str(attrs, semconv::GEN_AI_SYSTEM).map(|system| Category::GenAi { system })
}

/// Type, subtype and service target of a non-transaction span.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Classification<'a> {
    pub(crate) span_type: &'a str,
    pub(crate) subtype: Option<&'a str>,
    pub(crate) target_type: &'a str,
    pub(crate) target_name: Option<Cow<'a, str>>,
    pub(crate) resource: Option<Cow<'a, str>>,
}

impl Classification<'_> {
    /// Whether `service.target.*` should be written.
    pub(crate) fn has_target(&self) -> bool {
        !self.target_type.is_empty() || self.target_name.as_ref().is_some_and(|n| !n.is_empty())
    }
}

pub(crate) fn classify(span: &Span) -> Classification<'_> {
    let attrs = span.attributes.as_slice();
    let matched: Vec<Category<'_>> = RULES.iter().filter_map(|rule| rule(attrs)).collect();

    let (span_type, subtype) = match matched.first() {
        Some(category) => type_and_subtype(category),
        None if matches!(SpanKind::try_from(span.kind), Ok(SpanKind::Internal)) => {
            ("app", Some("internal"))
        }
        None => ("unknown", None),
    };

    let target_source = matched
        .iter()
        .find(|category| category.is_protocol())
        .or_else(|| {
            matched
                .iter()
                .find(|category| matches!(category, Category::Database { .. }))
        });

    let peer_service = get_str(attrs, semconv::PEER_SERVICE);
    let (target_type, target_name) = match target_source {
        Some(category) => resolve_target(category, attrs),
        None => ("", None),
    };
    let target_name = target_name.or_else(|| peer_service.map(Cow::Borrowed));

    let resource = match (target_source, get_str(attrs, semconv::MESSAGING_DESTINATION_NAME)) {
        (Some(Category::Messaging { system }), Some(destination)) => {
            Some(match peer_service.or(*system) {
                Some(prefix) => Cow::Owned(format!("{prefix}/{destination}")),
                None => Cow::Borrowed(destination),
            })
        }
        _ => target_name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| peer_service.map(Cow::Borrowed)),
    };

    Classification {
        span_type,
        subtype: subtype.filter(|s| !s.is_empty()),
        target_type,
        target_name,
        resource: resource.filter(|r| !r.is_empty()),
    }
}

fn type_and_subtype<'a>(category: &Category<'a>) -> (&'a str, Option<&'a str>) {
    match *category {
        Category::Database { system } => ("db", Some(system)),
        Category::Http => ("external", Some("http")),
        Category::Rpc { subtype } => ("external", subtype),
        Category::Messaging { system } => ("messaging", system),
        Category::GenAi { system } => ("genai", Some(system)),
    }
}

/// Target type and, when resolvable from the category itself, target name.
fn resolve_target<'a>(
    category: &Category<'a>,
    attrs: &'a [KeyValue],
) -> (&'a str, Option<Cow<'a, str>>) {
    match *category {
        Category::Http => ("http", http_target_name(attrs)),
        Category::Rpc { subtype } => (subtype.unwrap_or("external"), rpc_target_name(attrs)),
        Category::Messaging { system } => {
            let temporary = get_bool(attrs, semconv::MESSAGING_DESTINATION_TEMPORARY) == Some(true);
            let name = get_str(attrs, semconv::MESSAGING_DESTINATION_NAME)
                .filter(|_| !temporary)
                .map(Cow::Borrowed);
            (system.unwrap_or("messaging"), name)
        }
        Category::Database { system } => {
            (system, get_str(attrs, semconv::DB_NAME).map(Cow::Borrowed))
        }
        Category::GenAi { .. } => ("", None),
    }
}

fn http_target_name(attrs: &[KeyValue]) -> Option<Cow<'_, str>> {
    let full_url = get_str(attrs, semconv::URL_FULL).or_else(|| get_str(attrs, semconv::HTTP_URL));
    if let Some(raw) = full_url {
        match url_host_port(raw) {
            Ok(name) => return Some(Cow::Owned(name)),
            Err(err) => {
                otel_debug!(
                    name: "Enrichment.Target.InvalidUrl",
                    url = raw,
                    reason = err.to_string(),
                );
            }
        }
    }
    let domain = get_str(attrs, semconv::URL_DOMAIN)?;
    let port = get_int(attrs, semconv::URL_PORT)?;
    Some(Cow::Owned(format!("{domain}:{port}")))
}

fn url_host_port(raw: &str) -> Result<String, Error> {
    let url = Url::parse(raw)?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::MissingHost(raw.to_string()))?;
    Ok(match url.port_or_known_default() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn rpc_target_name(attrs: &[KeyValue]) -> Option<Cow<'_, str>> {
    if let Some(service) = get_str(attrs, semconv::RPC_SERVICE) {
        return Some(Cow::Borrowed(service));
    }
    host_with_port(attrs, semconv::SERVER_ADDRESS, semconv::SERVER_PORT)
        .or_else(|| host_with_port(attrs, semconv::NET_PEER_NAME, semconv::NET_PEER_PORT))
}

fn host_with_port<'a>(
    attrs: &'a [KeyValue],
    host_key: &str,
    port_key: &str,
) -> Option<Cow<'a, str>> {
    let host = get_str(attrs, host_key)?;
    Some(match get_int(attrs, port_key) {
        Some(port) => Cow::Owned(format!("{host}:{port}")),
        None => Cow::Borrowed(host),
    })
}
