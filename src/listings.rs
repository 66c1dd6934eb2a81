//! Reviews, blog posts and stats for a page, plus the concurrent fetch of
//! everything a service-town page needs from the directory.

use crate::constants::{POST_LIMIT, REVIEW_LIMIT};
use crate::directory::Directory;
use crate::error::Result;
use crate::matcher::{match_providers, matching_provider_ids, resolve_scope, Scope};
use crate::metrics::DirectoryMetrics;
use prohub_core::{BlogPost, Catalog, PageStats, Provider, Review};
use tracing::{instrument, warn};

/// Directory data for one service-town page. Every section may be empty.
#[derive(Debug, Clone, Default)]
pub struct PageData {
    pub providers: Vec<Provider>,
    pub reviews: Vec<Review>,
    pub posts: Vec<BlogPost>,
    pub stats: PageStats,
}

/// Latest reviews tagged with the service slug.
pub async fn recent_reviews(directory: &dyn Directory, service_slug: &str) -> Vec<Review> {
    directory
        .recent_reviews(service_slug, REVIEW_LIMIT)
        .await
        .unwrap_or_else(|e| downgrade("reviews", e))
}

/// Latest published posts for the service, local to the town or general.
pub async fn blog_posts(directory: &dyn Directory, service_slug: &str, town_slug: &str) -> Vec<BlogPost> {
    directory
        .published_posts(service_slug, Some(town_slug), POST_LIMIT)
        .await
        .unwrap_or_else(|e| downgrade("posts", e))
}

/// Provider count for the pair and the platform-wide average rating.
pub async fn page_stats(
    directory: &dyn Directory,
    catalog: &Catalog,
    service_slug: &str,
    town_slug: &str,
) -> PageStats {
    let provider_count = provider_count(directory, catalog, service_slug, town_slug)
        .await
        .unwrap_or_else(|e| downgrade("stats", e));

    let avg_rating = directory
        .verified_ratings()
        .await
        .map(|ratings| average_rating(&ratings))
        .unwrap_or_else(|e| downgrade("stats", e));

    PageStats {
        provider_count,
        avg_rating,
        ..PageStats::default()
    }
}

/// Fetches providers, reviews, posts and stats concurrently.
#[instrument(skip(directory, catalog))]
pub async fn fetch_page_data(
    directory: &dyn Directory,
    catalog: &Catalog,
    service_slug: &str,
    town_slug: &str,
) -> PageData {
    let (providers, reviews, posts, stats) = tokio::join!(
        match_providers(directory, catalog, service_slug, town_slug),
        recent_reviews(directory, service_slug),
        blog_posts(directory, service_slug, town_slug),
        page_stats(directory, catalog, service_slug, town_slug),
    );

    PageData {
        providers,
        reviews,
        posts,
        stats,
    }
}

async fn provider_count(
    directory: &dyn Directory,
    catalog: &Catalog,
    service_slug: &str,
    town_slug: &str,
) -> Result<u64> {
    match resolve_scope(directory, catalog, service_slug, town_slug).await? {
        Scope::Resolved {
            category_id,
            region_id,
        } => {
            let ids = matching_provider_ids(directory, &category_id, &region_id).await?;
            directory.count_verified(&ids).await
        }
        Scope::UnknownCategory { .. } | Scope::UnknownRegion { .. } => Ok(0),
    }
}

/// Mean of the positive ratings, to one decimal. `None` when there are none.
pub fn average_rating(ratings: &[f64]) -> Option<String> {
    let positive: Vec<f64> = ratings.iter().copied().filter(|r| *r > 0.0).collect();
    if positive.is_empty() {
        return None;
    }
    let mean = positive.iter().sum::<f64>() / positive.len() as f64;
    Some(format!("{:.1}", mean))
}

fn downgrade<T: Default>(lookup: &'static str, error: crate::error::SeoError) -> T {
    warn!("Directory lookup '{}' failed: {}", lookup, error);
    DirectoryMetrics::record_lookup_error(lookup);
    T::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_positive_ratings_to_one_decimal() {
        assert_eq!(average_rating(&[4.0, 5.0, 4.5]), Some("4.5".to_string()));
        assert_eq!(average_rating(&[4.24, 0.0]), Some("4.2".to_string()));
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[0.0]), None);
    }
}
