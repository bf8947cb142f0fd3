//! # Metric remappers
//!
//! Remappers read the metrics of a single instrumentation scope and append
//! derived metrics in the shape expected by Elastic integrations. Input
//! metrics are never modified. Every derived data point carries
//! `otel_remapped = true`.
pub mod hostmetrics;

mod remapped;
