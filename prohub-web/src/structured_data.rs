//! schema.org JSON-LD for the public pages.

use prohub_core::{Faq, Service, Town};
use serde_json::{json, Value};

use crate::views::{absolute_url, Crumb};

/// Serializes for embedding in `<script type="application/ld+json">`.
///
/// `</` is escaped so record text cannot close the script element.
pub fn to_script_body(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

pub fn service_schema(site_name: &str, base_url: &str, service: &Service, town: &Town) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Service",
        "serviceType": service.name,
        "areaServed": {
            "@type": "City",
            "name": town.name,
            "containedInPlace": { "@type": "State", "name": town.province }
        },
        "provider": { "@type": "Organization", "name": site_name, "url": base_url }
    })
}

/// Crumbs without an href are skipped.
pub fn breadcrumb_schema(base_url: &str, crumbs: &[Crumb]) -> Value {
    let items: Vec<Value> = crumbs
        .iter()
        .filter_map(|c| c.href.as_ref().map(|href| (c, href)))
        .enumerate()
        .map(|(i, (crumb, href))| {
            let item = if href.starts_with("http") {
                href.clone()
            } else {
                absolute_url(base_url, href)
            };
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": crumb.name,
                "item": item
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items
    })
}

pub fn faq_schema(faqs: &[Faq]) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": faqs.iter().map(|faq| json!({
            "@type": "Question",
            "name": faq.question,
            "acceptedAnswer": { "@type": "Answer", "text": faq.answer }
        })).collect::<Vec<_>>()
    })
}
