//! Static service and town catalogs.
//!
//! Loaded once per process from `services.json` (`{"services": [...]}`) and
//! `towns.json` (`{"towns": [...]}`) and never mutated afterwards.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::common::error::{ContentError, Result};
use crate::domain::{validate_slug, Service, Town};

/// Top-level route segments a service slug may not shadow.
pub const RESERVED_SLUGS: &[&str] = &[
    "town",
    "admin",
    "api",
    "health",
    "metrics",
    "static",
    "sitemap.xml",
    "robots.txt",
];

#[derive(Deserialize)]
struct ServicesFile {
    services: Vec<Service>,
}

#[derive(Deserialize)]
struct TownsFile {
    towns: Vec<Town>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    services: Vec<Service>,
    towns: Vec<Town>,
}

impl Catalog {
    pub fn new(services: Vec<Service>, towns: Vec<Town>) -> Result<Self> {
        let mut seen = HashSet::new();
        for service in &services {
            validate_slug(&service.slug)?;
            if RESERVED_SLUGS.contains(&service.slug.as_str()) {
                return Err(ContentError::Catalog(format!(
                    "service slug '{}' collides with a reserved route",
                    service.slug
                )));
            }
            if !seen.insert(service.slug.as_str()) {
                return Err(ContentError::Catalog(format!(
                    "duplicate service slug '{}'",
                    service.slug
                )));
            }
        }

        let mut seen = HashSet::new();
        for town in &towns {
            validate_slug(&town.slug)?;
            if !seen.insert(town.slug.as_str()) {
                return Err(ContentError::Catalog(format!(
                    "duplicate town slug '{}'",
                    town.slug
                )));
            }
        }

        Ok(Self { services, towns })
    }

    pub fn from_json(services_json: &str, towns_json: &str) -> Result<Self> {
        let services: ServicesFile = serde_json::from_str(services_json)?;
        let towns: TownsFile = serde_json::from_str(towns_json)?;
        Self::new(services.services, towns.towns)
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let services_json = fs::read_to_string(dir.join("services.json"))?;
        let towns_json = fs::read_to_string(dir.join("towns.json"))?;
        let catalog = Self::from_json(&services_json, &towns_json)?;
        info!(
            services = catalog.services.len(),
            towns = catalog.towns.len(),
            "Loaded catalog from {}",
            dir.display()
        );
        Ok(catalog)
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn towns(&self) -> &[Town] {
        &self.towns
    }

    pub fn service(&self, slug: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.slug == slug)
    }

    pub fn town(&self, slug: &str) -> Option<&Town> {
        self.towns.iter().find(|t| t.slug == slug)
    }

    pub fn towns_by_region(&self, region_slug: &str) -> Vec<&Town> {
        self.towns
            .iter()
            .filter(|t| t.region_slug == region_slug)
            .collect()
    }

    /// Distinct `(region_slug, region)` pairs in catalog order.
    pub fn regions(&self) -> Vec<(&str, &str)> {
        let mut seen = HashSet::new();
        self.towns
            .iter()
            .filter(|t| seen.insert(t.region_slug.as_str()))
            .map(|t| (t.region_slug.as_str(), t.region.as_str()))
            .collect()
    }

    /// Unknown slugs in the nearby list are skipped.
    pub fn nearby_towns(&self, town_slug: &str) -> Vec<&Town> {
        match self.town(town_slug) {
            Some(town) => town
                .nearby_towns
                .iter()
                .filter_map(|slug| self.town(slug))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn related_services(&self, service_slug: &str) -> Vec<&Service> {
        match self.service(service_slug) {
            Some(service) => service
                .related_services
                .iter()
                .filter_map(|slug| self.service(slug))
                .collect(),
            None => Vec::new(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_resolve_cross_references() {
        let catalog = fixtures::catalog();
        assert_eq!(catalog.services().len(), 2);
        assert_eq!(catalog.service("plumber").unwrap().name_plural, "Plumbers");
        assert!(catalog.service("roofer").is_none());

        let nearby: Vec<_> = catalog.nearby_towns("george").iter().map(|t| t.slug.clone()).collect();
        assert_eq!(nearby, vec!["mossel-bay"]);

        let related: Vec<_> = catalog
            .related_services("plumber")
            .iter()
            .map(|s| s.slug.clone())
            .collect();
        assert_eq!(related, vec!["electrician"]);
        assert!(catalog.nearby_towns("unknown").is_empty());
    }

    #[test]
    fn regions_are_distinct_and_ordered() {
        let catalog = fixtures::catalog();
        assert_eq!(
            catalog.regions(),
            vec![("garden-route", "Garden Route"), ("klein-karoo", "Klein Karoo")]
        );
        assert_eq!(catalog.towns_by_region("garden-route").len(), 2);
    }

    #[test]
    fn rejects_duplicate_and_reserved_slugs() {
        let catalog = fixtures::catalog();
        let mut services = catalog.services().to_vec();
        services.push(services[0].clone());
        assert!(Catalog::new(services, catalog.towns().to_vec()).is_err());

        let mut reserved = catalog.services()[0].clone();
        reserved.slug = "town".to_string();
        assert!(Catalog::new(vec![reserved], catalog.towns().to_vec()).is_err());
    }
}
