//! Admin panel metrics

use crate::metrics::{area_metric, AreaMetrics, MetricDoc, MetricType};

pub struct AdminMetrics;

impl AdminMetrics {
    pub fn record_login(success: bool) {
        let outcome = if success { "success" } else { "rejected" };
        ::metrics::counter!(area_metric!(counter, "admin", "logins"), "outcome" => outcome).increment(1);
    }

    pub fn record_approval(success: bool) {
        let outcome = if success { "success" } else { "failed" };
        ::metrics::counter!(area_metric!(counter, "admin", "approvals"), "outcome" => outcome)
            .increment(1);
    }
}

impl AreaMetrics for AdminMetrics {
    fn register_metrics() {
        ::metrics::describe_counter!(
            area_metric!(counter, "admin", "logins"),
            "Admin login attempts by outcome"
        );
        ::metrics::describe_counter!(
            area_metric!(counter, "admin", "approvals"),
            "Content approvals by outcome"
        );
    }

    fn area_name() -> &'static str {
        "admin"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: area_metric!(counter, "admin", "logins"),
                metric_type: MetricType::Counter,
                help: "Admin login attempts by outcome",
                labels: vec!["outcome"],
            },
            MetricDoc {
                name: area_metric!(counter, "admin", "approvals"),
                metric_type: MetricType::Counter,
                help: "Content approvals by outcome",
                labels: vec!["outcome"],
            },
        ]
    }
}
