//! URL enumeration for pre-rendering and the sitemap feed.
//!
//! Every service index, every service × town page and every town index is
//! published regardless of provider coverage; sparse pages rely on the
//! empty-state sections.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::catalog::Catalog;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SitePath {
    ServiceIndex { service: String },
    ServiceTown { service: String, town: String },
    TownIndex { town: String },
}

impl SitePath {
    pub fn url_path(&self) -> String {
        match self {
            SitePath::ServiceIndex { service } => format!("/{}", service),
            SitePath::ServiceTown { service, town } => format!("/{}/{}", service, town),
            SitePath::TownIndex { town } => format!("/town/{}", town),
        }
    }

    pub fn priority(&self) -> f32 {
        match self {
            SitePath::ServiceIndex { .. } => 0.8,
            SitePath::ServiceTown { .. } => 1.0,
            SitePath::TownIndex { .. } => 0.7,
        }
    }

    pub fn change_frequency(&self) -> &'static str {
        "weekly"
    }
}

/// All (service, town) slug pairs, service-major.
pub fn page_pairs(catalog: &Catalog) -> Vec<(String, String)> {
    catalog
        .services()
        .iter()
        .flat_map(|service| {
            catalog
                .towns()
                .iter()
                .map(move |town| (service.slug.clone(), town.slug.clone()))
        })
        .collect()
}

/// Each service index followed by its town pages, then every town index.
pub fn site_paths(catalog: &Catalog) -> Vec<SitePath> {
    let mut paths = Vec::with_capacity(
        catalog.services().len() * (catalog.towns().len() + 1) + catalog.towns().len(),
    );

    for service in catalog.services() {
        paths.push(SitePath::ServiceIndex {
            service: service.slug.clone(),
        });
        for town in catalog.towns() {
            paths.push(SitePath::ServiceTown {
                service: service.slug.clone(),
                town: town.slug.clone(),
            });
        }
    }

    for town in catalog.towns() {
        paths.push(SitePath::TownIndex {
            town: town.slug.clone(),
        });
    }

    paths
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_sitemap(base_url: &str, paths: &[SitePath], last_modified: DateTime<Utc>) -> String {
    let base = base_url.trim_end_matches('/');
    let lastmod = last_modified.format("%Y-%m-%d").to_string();

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for path in paths {
        // Writing into a String cannot fail.
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape_xml(&format!("{}{}", base, path.url_path())),
            lastmod,
            path.change_frequency(),
            path.priority(),
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use std::collections::HashSet;

    #[test]
    fn enumeration_count_matches_matrix_without_duplicates() {
        let catalog = fixtures::catalog();
        let services = catalog.services().len();
        let towns = catalog.towns().len();

        let paths = site_paths(&catalog);
        assert_eq!(paths.len(), services * towns + services + towns);

        let urls: HashSet<_> = paths.iter().map(|p| p.url_path()).collect();
        assert_eq!(urls.len(), paths.len());
        assert_eq!(page_pairs(&catalog).len(), services * towns);
    }

    #[test]
    fn single_service_single_town() {
        let full = fixtures::catalog();
        let catalog = Catalog::new(
            vec![full.service("plumber").unwrap().clone()],
            vec![full.town("george").unwrap().clone()],
        )
        .unwrap();

        let urls: Vec<_> = site_paths(&catalog).iter().map(|p| p.url_path()).collect();
        assert_eq!(urls, vec!["/plumber", "/plumber/george", "/town/george"]);
    }

    #[test]
    fn sitemap_lists_every_path_with_priority() {
        let catalog = fixtures::catalog();
        let paths = site_paths(&catalog);
        let xml = render_sitemap("https://prohub.co.za/", &paths, Utc::now());

        assert_eq!(xml.matches("<url>").count(), paths.len());
        assert!(xml.contains("<loc>https://prohub.co.za/plumber/george</loc>"));
        assert!(xml.contains("<loc>https://prohub.co.za/town/oudtshoorn</loc>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<priority>0.7</priority>"));
    }

    #[test]
    fn xml_escaping() {
        assert_eq!(escape_xml("a&b<c>"), "a&amp;b&lt;c&gt;");
    }
}
