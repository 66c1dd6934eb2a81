//! Metrics for the SEO site
//!
//! Each area (page rendering, directory lookups, admin actions) defines its
//! counters in its own submodule. The Prometheus recorder is installed in
//! process and rendered by the web server's `/metrics` route.

pub mod admin;
pub mod directory;
pub mod pages;
pub mod registry;

pub use admin::AdminMetrics;
pub use directory::DirectoryMetrics;
pub use pages::PageMetrics;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::{Once, OnceLock};
use tracing::{info, warn};

static INIT: Once = Once::new();
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Idempotent.
pub fn init_metrics() {
    INIT.call_once(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if HANDLE.set(handle).is_err() {
                warn!("Prometheus handle was already set");
            }
            registry::register_all_metrics();
            info!("Prometheus recorder installed");
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
        }
    });
}

/// Render the current snapshot in Prometheus text format.
///
/// `None` until `init_metrics` has installed a recorder.
pub fn render() -> Option<String> {
    HANDLE.get().map(|handle| handle.render())
}

/// Trait for area-specific metrics collections
pub trait AreaMetrics {
    /// Describe every metric of this area to the recorder
    fn register_metrics();

    fn area_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
}

/// Builds metric names following `prohub_{area}_{name}_total`
macro_rules! area_metric {
    (counter, $area:literal, $name:literal) => {
        concat!("prohub_", $area, "_", $name, "_total")
    };
}

pub(crate) use area_metric;
