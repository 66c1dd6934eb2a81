use super::{
    CategoryRow, Directory, FeaturedListingRow, NamedRow, ProviderCategoryRow, ProviderRegionRow,
    ProviderRow, ACTIVE_LISTING_STATUS,
};
use crate::error::{Result, SeoError};
use async_trait::async_trait;
use prohub_core::{BlogPost, Review};
use std::sync::{Arc, Mutex};

/// Rows held by an [`InMemoryDirectory`].
#[derive(Debug, Clone, Default)]
pub struct DirectoryData {
    pub categories: Vec<CategoryRow>,
    pub regions: Vec<NamedRow>,
    pub provider_categories: Vec<ProviderCategoryRow>,
    pub provider_regions: Vec<ProviderRegionRow>,
    pub providers: Vec<ProviderRow>,
    /// (listing status, row)
    pub featured_listings: Vec<(String, FeaturedListingRow)>,
    pub reviews: Vec<Review>,
    /// (is_published, post)
    pub blog_posts: Vec<(bool, BlogPost)>,
}

/// In-memory directory used when no Supabase project is configured, and as
/// a test double. `set_failing` makes every lookup return an API error.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    data: Arc<Mutex<DirectoryData>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl InMemoryDirectory {
    pub fn new(data: DirectoryData) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, message: Option<&str>) {
        *self.failure.lock().unwrap() = message.map(str::to_string);
    }

    fn read<T>(&self, f: impl FnOnce(&DirectoryData) -> T) -> Result<T> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(SeoError::Api { message });
        }
        let data = self.data.lock().unwrap();
        Ok(f(&data))
    }
}

fn verified_in<'a>(data: &'a DirectoryData, ids: &'a [String]) -> impl Iterator<Item = &'a ProviderRow> {
    data.providers
        .iter()
        .filter(move |p| ids.contains(&p.id) && p.is_verified())
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn category_id(&self, category_slug: &str) -> Result<Option<String>> {
        self.read(|d| {
            d.categories
                .iter()
                .find(|c| c.slug == category_slug)
                .map(|c| c.id.clone())
        })
    }

    async fn region_id(&self, region_name: &str) -> Result<Option<String>> {
        self.read(|d| d.regions.iter().find(|r| r.name == region_name).map(|r| r.id.clone()))
    }

    async fn category_provider_ids(&self, category_id: &str) -> Result<Vec<String>> {
        self.read(|d| {
            d.provider_categories
                .iter()
                .filter(|l| l.category_id == category_id)
                .map(|l| l.provider_id.clone())
                .collect()
        })
    }

    async fn region_provider_ids(&self, region_id: &str) -> Result<Vec<String>> {
        self.read(|d| {
            d.provider_regions
                .iter()
                .filter(|l| l.region_id == region_id)
                .map(|l| l.provider_id.clone())
                .collect()
        })
    }

    async fn verified_providers(&self, ids: &[String]) -> Result<Vec<ProviderRow>> {
        self.read(|d| verified_in(d, ids).cloned().collect())
    }

    async fn active_featured(&self, ids: &[String]) -> Result<Vec<FeaturedListingRow>> {
        self.read(|d| {
            d.featured_listings
                .iter()
                .filter(|(status, row)| status == ACTIVE_LISTING_STATUS && ids.contains(&row.provider_id))
                .map(|(_, row)| row.clone())
                .collect()
        })
    }

    async fn categories(&self) -> Result<Vec<NamedRow>> {
        self.read(|d| {
            d.categories
                .iter()
                .map(|c| NamedRow {
                    id: c.id.clone(),
                    name: c.name.clone(),
                })
                .collect()
        })
    }

    async fn regions(&self) -> Result<Vec<NamedRow>> {
        self.read(|d| d.regions.clone())
    }

    async fn provider_categories(&self, ids: &[String]) -> Result<Vec<ProviderCategoryRow>> {
        self.read(|d| {
            d.provider_categories
                .iter()
                .filter(|l| ids.contains(&l.provider_id))
                .cloned()
                .collect()
        })
    }

    async fn provider_regions(&self, ids: &[String]) -> Result<Vec<ProviderRegionRow>> {
        self.read(|d| {
            d.provider_regions
                .iter()
                .filter(|l| ids.contains(&l.provider_id))
                .cloned()
                .collect()
        })
    }

    async fn count_verified(&self, ids: &[String]) -> Result<u64> {
        self.read(|d| verified_in(d, ids).count() as u64)
    }

    async fn verified_ratings(&self) -> Result<Vec<f64>> {
        self.read(|d| {
            d.providers
                .iter()
                .filter(|p| p.is_verified())
                .filter_map(|p| p.avg_rating)
                .filter(|r| *r > 0.0)
                .collect()
        })
    }

    async fn recent_reviews(&self, service_category: &str, limit: usize) -> Result<Vec<Review>> {
        self.read(|d| {
            let mut reviews: Vec<Review> = d
                .reviews
                .iter()
                .filter(|r| r.service_category == service_category)
                .cloned()
                .collect();
            reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            reviews.truncate(limit);
            reviews
        })
    }

    async fn published_posts(
        &self,
        category: &str,
        location: Option<&str>,
        limit: usize,
    ) -> Result<Vec<BlogPost>> {
        self.read(|d| {
            let mut posts: Vec<BlogPost> = d
                .blog_posts
                .iter()
                .filter(|(published, post)| *published && post.category == category)
                .filter(|(_, post)| match (location, post.location.as_deref()) {
                    (Some(wanted), Some(actual)) => wanted == actual,
                    _ => true,
                })
                .map(|(_, post)| post.clone())
                .collect();
            posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
            posts.truncate(limit);
            posts
        })
    }
}
