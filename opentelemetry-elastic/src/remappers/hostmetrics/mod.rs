//! Remapping of the metrics produced by the collector's
//! `hostmetricsreceiver` into the metrics of the Elastic System integration.
//!
//! ```
//! use opentelemetry_elastic::remappers::hostmetrics::{Config, Remapper};
//! use opentelemetry_proto::tonic::common::v1::InstrumentationScope;
//! use opentelemetry_proto::tonic::metrics::v1::ScopeMetrics;
//! use opentelemetry_proto::tonic::resource::v1::Resource;
//!
//! let remapper = Remapper::new(Config {
//!     system_integration_dataset: true,
//! });
//! let scope_metrics = ScopeMetrics {
//!     scope: Some(InstrumentationScope {
//!         name: "otelcol/hostmetricsreceiver/memory".into(),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! let mut out = Vec::new();
//! remapper.remap(&scope_metrics, &mut out, &Resource::default());
//! assert!(out.is_empty());
//! ```
use opentelemetry::otel_debug;
use opentelemetry_proto::tonic::metrics::v1::{Metric, ScopeMetrics};
use opentelemetry_proto::tonic::resource::v1::Resource;

#[cfg(feature = "serde")]
use serde::Deserialize;

mod filesystem;
mod memory;

const RECEIVER_SCOPE: &str = "hostmetricsreceiver";
const SCRAPER_SUFFIX: &str = "scraper";

/// Host metrics remapper configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Tag remapped data points with the dataset of the System integration,
    /// e.g. `system.memory`.
    pub system_integration_dataset: bool,
}

/// Remaps the metrics of one `hostmetricsreceiver` scraper scope.
#[derive(Clone, Debug, Default)]
pub struct Remapper {
    config: Config,
}

impl Remapper {
    /// Create a remapper with the given configuration.
    pub fn new(config: Config) -> Self {
        Remapper { config }
    }

    /// Appends the metrics derived from `scope_metrics` to `out`.
    ///
    /// Scopes that were not produced by the `hostmetricsreceiver`, or by a
    /// scraper without a remapping, leave `out` untouched.
    pub fn remap(&self, scope_metrics: &ScopeMetrics, out: &mut Vec<Metric>, resource: &Resource) {
        let scope_name = scope_metrics
            .scope
            .as_ref()
            .map(|scope| scope.name.as_str())
            .unwrap_or_default();
        let Some(scraper) = scraper_name(scope_name) else {
            return;
        };

        let dataset = self
            .config
            .system_integration_dataset
            .then(|| format!("system.{scraper}"));
        let dataset = dataset.as_deref();

        match scraper {
            "memory" => memory::remap(&scope_metrics.metrics, out, resource, dataset),
            "filesystem" => filesystem::remap(&scope_metrics.metrics, out, resource, dataset),
            _ => {
                otel_debug!(
                    name: "Remapper.HostMetrics.UnsupportedScraper",
                    scope = scope_name,
                    scraper = scraper,
                );
            }
        }
    }
}

/// `otelcol/hostmetricsreceiver/memoryscraper` yields `memory`.
fn scraper_name(scope_name: &str) -> Option<&str> {
    if !scope_name.contains(RECEIVER_SCOPE) {
        return None;
    }
    let last = scope_name.rsplit('/').next().unwrap_or(scope_name);
    Some(last.strip_suffix(SCRAPER_SUFFIX).unwrap_or(last))
}
