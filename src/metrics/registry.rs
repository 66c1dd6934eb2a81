//! Registration of every metrics area

use crate::metrics::{AdminMetrics, AreaMetrics, DirectoryMetrics, MetricDoc, PageMetrics};
use tracing::debug;

pub fn register_all_metrics() {
    PageMetrics::register_metrics();
    DirectoryMetrics::register_metrics();
    AdminMetrics::register_metrics();
    debug!(
        "Registered metrics for areas: {}, {}, {}",
        PageMetrics::area_name(),
        DirectoryMetrics::area_name(),
        AdminMetrics::area_name()
    );
}

pub fn all_metric_docs() -> Vec<MetricDoc> {
    let mut docs = PageMetrics::metrics_documentation();
    docs.extend(DirectoryMetrics::metrics_documentation());
    docs.extend(AdminMetrics::metrics_documentation());
    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn metric_names_are_unique_and_prefixed() {
        let docs = all_metric_docs();
        let names: HashSet<_> = docs.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), docs.len());
        for doc in &docs {
            assert!(doc.name.starts_with("prohub_"), "{}", doc.name);
            assert!(doc.name.ends_with("_total"), "{}", doc.name);
        }
    }
}
