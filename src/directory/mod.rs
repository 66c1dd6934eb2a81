//! Read-only access to the provider directory (categories, regions, providers,
//! featured listings, reviews and blog posts).

pub mod in_memory;
pub mod supabase;

pub use in_memory::{DirectoryData, InMemoryDirectory};
pub use supabase::SupabaseClient;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prohub_core::{BlogPost, Review};
use prohub_core::common::serde_ext::id_string;
use serde::{Deserialize, Serialize};

/// Provider status value for vetted providers.
pub const VERIFIED_STATUS: &str = "verified";

/// Featured listing status value for paid placements currently running.
pub const ACTIVE_LISTING_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCategoryRow {
    #[serde(deserialize_with = "id_string")]
    pub provider_id: String,
    #[serde(deserialize_with = "id_string")]
    pub category_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRegionRow {
    #[serde(deserialize_with = "id_string")]
    pub provider_id: String,
    #[serde(deserialize_with = "id_string")]
    pub region_id: String,
}

/// A `providers` row as stored; mapped to `prohub_core::Provider` by the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub business_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub years_experience: Option<u32>,
    pub status: String,
    #[serde(default)]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub total_reviews: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProviderRow {
    pub fn is_verified(&self) -> bool {
        self.status == VERIFIED_STATUS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedListingRow {
    #[serde(deserialize_with = "id_string")]
    pub provider_id: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl FeaturedListingRow {
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires| expires > now)
    }
}

/// Directory lookups used to compose a page.
///
/// Each method maps to one query against the directory. Implementations
/// return `Ok(vec![])` for empty id lists without touching the backend.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn category_id(&self, category_slug: &str) -> Result<Option<String>>;

    async fn region_id(&self, region_name: &str) -> Result<Option<String>>;

    async fn category_provider_ids(&self, category_id: &str) -> Result<Vec<String>>;

    async fn region_provider_ids(&self, region_id: &str) -> Result<Vec<String>>;

    /// Verified providers among `ids`
    async fn verified_providers(&self, ids: &[String]) -> Result<Vec<ProviderRow>>;

    /// Active featured listings for `ids`; expiry is checked by the caller
    async fn active_featured(&self, ids: &[String]) -> Result<Vec<FeaturedListingRow>>;

    async fn categories(&self) -> Result<Vec<NamedRow>>;

    async fn regions(&self) -> Result<Vec<NamedRow>>;

    async fn provider_categories(&self, ids: &[String]) -> Result<Vec<ProviderCategoryRow>>;

    async fn provider_regions(&self, ids: &[String]) -> Result<Vec<ProviderRegionRow>>;

    /// Number of verified providers among `ids`
    async fn count_verified(&self, ids: &[String]) -> Result<u64>;

    /// Positive average ratings of all verified providers
    async fn verified_ratings(&self) -> Result<Vec<f64>>;

    /// Newest first
    async fn recent_reviews(&self, service_category: &str, limit: usize) -> Result<Vec<Review>>;

    /// Newest first; `location` also admits posts without a location
    async fn published_posts(
        &self,
        category: &str,
        location: Option<&str>,
        limit: usize,
    ) -> Result<Vec<BlogPost>>;
}
