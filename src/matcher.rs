//! Provider matching for a service-town page.
//!
//! Providers match when they are linked to both the service's category and
//! the town's region, are verified, and then rank featured-first by rating.

use crate::constants::{region_name_for_town, seo_slug_to_category_slug, MAX_MATCHED_PROVIDERS};
use crate::directory::{Directory, NamedRow};
use crate::error::Result;
use crate::metrics::DirectoryMetrics;
use chrono::{DateTime, Utc};
use prohub_core::{Catalog, Provider};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument, warn};

/// Directory ids a (service, town) pair resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Resolved { category_id: String, region_id: String },
    UnknownCategory { category_slug: String },
    UnknownRegion { region_name: String },
}

/// Outcome of [`try_match_providers`].
///
/// The unknown variants mean a slug translation found nothing in the
/// directory. They are not errors but are worth alerting on, which an empty
/// list alone would hide.
#[derive(Debug, Clone)]
pub enum ProviderMatch {
    Matched(Vec<Provider>),
    UnknownCategory { category_slug: String },
    UnknownRegion { region_name: String },
}

impl ProviderMatch {
    pub fn into_providers(self) -> Vec<Provider> {
        match self {
            ProviderMatch::Matched(providers) => providers,
            _ => Vec::new(),
        }
    }
}

/// Translate slugs and look up the category and region ids.
pub async fn resolve_scope(
    directory: &dyn Directory,
    catalog: &Catalog,
    service_slug: &str,
    town_slug: &str,
) -> Result<Scope> {
    let category_slug = seo_slug_to_category_slug(service_slug);
    let Some(category_id) = directory.category_id(&category_slug).await? else {
        return Ok(Scope::UnknownCategory { category_slug });
    };

    let region_name = region_name_for_town(catalog, town_slug);
    let Some(region_id) = directory.region_id(&region_name).await? else {
        return Ok(Scope::UnknownRegion { region_name });
    };

    Ok(Scope::Resolved {
        category_id,
        region_id,
    })
}

/// Provider ids linked to both the category and the region, in region-link order.
pub async fn matching_provider_ids(
    directory: &dyn Directory,
    category_id: &str,
    region_id: &str,
) -> Result<Vec<String>> {
    let in_category: HashSet<String> = directory
        .category_provider_ids(category_id)
        .await?
        .into_iter()
        .collect();

    let mut seen = HashSet::new();
    Ok(directory
        .region_provider_ids(region_id)
        .await?
        .into_iter()
        .filter(|id| in_category.contains(id) && seen.insert(id.clone()))
        .collect())
}

/// Match providers, reporting which translation failed if any.
#[instrument(skip(directory, catalog, now))]
pub async fn try_match_providers(
    directory: &dyn Directory,
    catalog: &Catalog,
    service_slug: &str,
    town_slug: &str,
    now: DateTime<Utc>,
) -> Result<ProviderMatch> {
    let (category_id, region_id) =
        match resolve_scope(directory, catalog, service_slug, town_slug).await? {
            Scope::Resolved {
                category_id,
                region_id,
            } => (category_id, region_id),
            Scope::UnknownCategory { category_slug } => {
                return Ok(ProviderMatch::UnknownCategory { category_slug })
            }
            Scope::UnknownRegion { region_name } => {
                return Ok(ProviderMatch::UnknownRegion { region_name })
            }
        };

    let ids = matching_provider_ids(directory, &category_id, &region_id).await?;
    if ids.is_empty() {
        debug!("No providers linked to both category {} and region {}", category_id, region_id);
        return Ok(ProviderMatch::Matched(Vec::new()));
    }

    let rows = directory.verified_providers(&ids).await?;
    if rows.is_empty() {
        return Ok(ProviderMatch::Matched(Vec::new()));
    }
    let row_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();

    let featured_until = featured_listings(directory, &row_ids, now).await?;
    let category_names = names_by_id(directory.categories().await?);
    let region_names = names_by_id(directory.regions().await?);
    let provider_categories = directory.provider_categories(&row_ids).await?;
    let provider_regions = directory.provider_regions(&row_ids).await?;

    let mut providers: Vec<Provider> = rows
        .into_iter()
        .filter(|row| row.is_verified())
        .map(|row| {
            let featured = featured_until.get(&row.id);
            Provider {
                categories: provider_categories
                    .iter()
                    .filter(|l| l.provider_id == row.id)
                    .filter_map(|l| category_names.get(&l.category_id).cloned())
                    .collect(),
                regions: provider_regions
                    .iter()
                    .filter(|l| l.provider_id == row.id)
                    .filter_map(|l| region_names.get(&l.region_id).cloned())
                    .collect(),
                is_verified: true,
                is_featured: featured.is_some(),
                featured_until: featured.copied().flatten(),
                id: row.id,
                business_name: row.business_name,
                avatar_url: row.avatar_url,
                cover_image_url: row.cover_image_url,
                bio: row.description,
                years_experience: row.years_experience,
                avg_rating: row.avg_rating,
                total_reviews: row.total_reviews,
                created_at: row.created_at,
            }
        })
        .collect();

    rank_providers(&mut providers);
    providers.truncate(MAX_MATCHED_PROVIDERS);
    Ok(ProviderMatch::Matched(providers))
}

/// Providers for a page. Unresolved slugs and directory failures are logged
/// and yield an empty list.
pub async fn match_providers(
    directory: &dyn Directory,
    catalog: &Catalog,
    service_slug: &str,
    town_slug: &str,
) -> Vec<Provider> {
    match try_match_providers(directory, catalog, service_slug, town_slug, Utc::now()).await {
        Ok(ProviderMatch::Matched(providers)) => providers,
        Ok(ProviderMatch::UnknownCategory { category_slug }) => {
            warn!(
                "Category '{}' (service '{}') not found in directory",
                category_slug, service_slug
            );
            DirectoryMetrics::record_unresolved("category");
            Vec::new()
        }
        Ok(ProviderMatch::UnknownRegion { region_name }) => {
            warn!("Region '{}' (town '{}') not found in directory", region_name, town_slug);
            DirectoryMetrics::record_unresolved("region");
            Vec::new()
        }
        Err(e) => {
            warn!("Provider lookup failed for {}/{}: {}", service_slug, town_slug, e);
            DirectoryMetrics::record_lookup_error("providers");
            Vec::new()
        }
    }
}

/// Featured first, then average rating descending (missing counts as 0).
pub fn rank_providers(providers: &mut [Provider]) {
    providers.sort_by(|a, b| {
        b.is_featured
            .cmp(&a.is_featured)
            .then_with(|| b.rating_or_zero().total_cmp(&a.rating_or_zero()))
    });
}

/// Current featured listings by provider id, with the latest expiry
/// (`None` = open-ended).
async fn featured_listings(
    directory: &dyn Directory,
    ids: &[String],
    now: DateTime<Utc>,
) -> Result<HashMap<String, Option<DateTime<Utc>>>> {
    let mut featured: HashMap<String, Option<DateTime<Utc>>> = HashMap::new();
    for listing in directory.active_featured(ids).await? {
        if !listing.is_current(now) {
            continue;
        }
        featured
            .entry(listing.provider_id)
            .and_modify(|until| {
                *until = match (*until, listing.expires_at) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    _ => None,
                }
            })
            .or_insert(listing.expires_at);
    }
    Ok(featured)
}

fn names_by_id(rows: Vec<NamedRow>) -> HashMap<String, String> {
    rows.into_iter().map(|r| (r.id, r.name)).collect()
}
