//! # OpenTelemetry Elastic
//!
//! Enriches OTLP trace data with the derived fields an Elastic APM backend
//! expects, and remaps host metrics into the shape of the Elastic System
//! integration.
//!
//! ## Trace enrichment
//!
//! Every span is classified either as a *transaction* (a service entry
//! point: no parent, a remote parent, or a server/consumer span) or as a
//! *span* (work performed inside a transaction). Depending on the
//! classification the span receives identity, type/subtype, outcome,
//! service target and sampling weight attributes. Exception events attached
//! to the span are turned into error records with a stable grouping key.
//!
//! ```
//! use opentelemetry_elastic::{config::Config, trace::enrich_span};
//! use opentelemetry_proto::tonic::trace::v1::Span;
//!
//! let mut span = Span {
//!     name: "GET /users".into(),
//!     span_id: vec![1, 2, 3, 4, 5, 6, 7, 8],
//!     ..Default::default()
//! };
//! enrich_span(&mut span, &Config::enabled());
//!
//! assert!(span.attributes.iter().any(|kv| kv.key == "transaction.id"));
//! ```
//!
//! Enrichment is a pure, synchronous pass over a single span. Independent
//! spans can be enriched concurrently from any number of threads.
//!
//! ## Host metrics remapping
//!
//! [`remappers::hostmetrics::Remapper`] reads the raw metrics produced by the
//! collector's `hostmetricsreceiver` and emits derived totals and
//! percentages tagged with `otel_remapped = true`.
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/open-telemetry/opentelemetry-rust/main/assets/logo.svg"
)]

pub mod attributes;
mod attrs;
pub mod config;
mod error;
pub mod remappers;
pub mod trace;

pub use error::Error;
