//! Page rendering metrics

use crate::metrics::{area_metric, AreaMetrics, MetricDoc, MetricType};

pub struct PageMetrics;

impl PageMetrics {
    /// `kind` is one of `service`, `service_town`, `town`, `sitemap`
    pub fn record_page_rendered(kind: &'static str) {
        ::metrics::counter!(area_metric!(counter, "pages", "rendered"), "kind" => kind).increment(1);
    }

    /// Which content tier served a service-town page (`live`, `pending`, `default`)
    pub fn record_content_source(source: &'static str) {
        ::metrics::counter!(area_metric!(counter, "pages", "content_source"), "source" => source)
            .increment(1);
    }

    pub fn record_not_found() {
        ::metrics::counter!(area_metric!(counter, "pages", "not_found")).increment(1);
    }
}

impl AreaMetrics for PageMetrics {
    fn register_metrics() {
        ::metrics::describe_counter!(
            area_metric!(counter, "pages", "rendered"),
            "Pages rendered, by page kind"
        );
        ::metrics::describe_counter!(
            area_metric!(counter, "pages", "content_source"),
            "Service-town pages by the content tier that served them"
        );
        ::metrics::describe_counter!(
            area_metric!(counter, "pages", "not_found"),
            "Requests for unknown service or town slugs"
        );
    }

    fn area_name() -> &'static str {
        "pages"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: area_metric!(counter, "pages", "rendered"),
                metric_type: MetricType::Counter,
                help: "Pages rendered, by page kind",
                labels: vec!["kind"],
            },
            MetricDoc {
                name: area_metric!(counter, "pages", "content_source"),
                metric_type: MetricType::Counter,
                help: "Service-town pages by the content tier that served them",
                labels: vec!["source"],
            },
            MetricDoc {
                name: area_metric!(counter, "pages", "not_found"),
                metric_type: MetricType::Counter,
                help: "Requests for unknown service or town slugs",
                labels: vec![],
            },
        ]
    }
}
