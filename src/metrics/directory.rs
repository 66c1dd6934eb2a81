//! Provider directory metrics

use crate::metrics::{area_metric, AreaMetrics, MetricDoc, MetricType};

pub struct DirectoryMetrics;

impl DirectoryMetrics {
    /// A lookup failed and the page section was rendered empty
    pub fn record_lookup_error(lookup: &'static str) {
        ::metrics::counter!(area_metric!(counter, "directory", "lookup_errors"), "lookup" => lookup)
            .increment(1);
    }

    /// A service or town slug had no counterpart in the directory
    pub fn record_unresolved(kind: &'static str) {
        ::metrics::counter!(area_metric!(counter, "directory", "unresolved"), "kind" => kind)
            .increment(1);
    }
}

impl AreaMetrics for DirectoryMetrics {
    fn register_metrics() {
        ::metrics::describe_counter!(
            area_metric!(counter, "directory", "lookup_errors"),
            "Directory lookups that failed and were downgraded to empty"
        );
        ::metrics::describe_counter!(
            area_metric!(counter, "directory", "unresolved"),
            "Slug translations with no matching category or region"
        );
    }

    fn area_name() -> &'static str {
        "directory"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: area_metric!(counter, "directory", "lookup_errors"),
                metric_type: MetricType::Counter,
                help: "Directory lookups that failed and were downgraded to empty",
                labels: vec!["lookup"],
            },
            MetricDoc {
                name: area_metric!(counter, "directory", "unresolved"),
                metric_type: MetricType::Counter,
                help: "Slug translations with no matching category or region",
                labels: vec!["kind"],
            },
        ]
    }
}
