use super::{
    Directory, FeaturedListingRow, NamedRow, ProviderCategoryRow, ProviderRegionRow, ProviderRow,
    ACTIVE_LISTING_STATUS, VERIFIED_STATUS,
};
use crate::config::SupabaseConfig;
use crate::error::{Result, SeoError};
use async_trait::async_trait;
use prohub_core::{BlogPost, Review};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER_COLUMNS: &str = "id,business_name,avatar_url,cover_image_url,description,years_experience,status,avg_rating,total_reviews,created_at";

/// PostgREST client for the Supabase project holding the provider directory.
///
/// Authenticates with the project's anon key, sent both as `apikey` and as a
/// bearer token.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    rest_url: String,
}

impl SupabaseClient {
    pub fn new(url: &str, anon_key: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(anon_key)
            .map_err(|e| SeoError::Config(format!("Invalid Supabase anon key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", anon_key))
            .map_err(|e| SeoError::Config(format!("Invalid Supabase anon key: {}", e)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
        })
    }

    /// `None` when the URL or key is not configured.
    pub fn from_config(config: &SupabaseConfig) -> Result<Option<Self>> {
        if !config.is_configured() {
            return Ok(None);
        }
        let url = config.url.as_deref().unwrap_or_default();
        let key = config.anon_key.as_deref().unwrap_or_default();
        Self::new(url, key, Duration::from_secs(config.timeout_secs)).map(Some)
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, String)]) -> Result<Vec<T>> {
        let endpoint = format!("{}/{}", self.rest_url, table);
        debug!("GET {} {:?}", endpoint, query);

        let response = self.http.get(&endpoint).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SeoError::Api {
                message: format!("{} query failed: {} - {}", table, status, body),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Exact row count via `Prefer: count=exact` on a HEAD request.
    async fn count(&self, table: &str, query: &[(&str, String)]) -> Result<u64> {
        let endpoint = format!("{}/{}", self.rest_url, table);
        let response = self
            .http
            .head(&endpoint)
            .header("Prefer", "count=exact")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SeoError::Api {
                message: format!("{} count failed: {}", table, status),
            });
        }

        let range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| SeoError::Api {
                message: format!("{} count response has no Content-Range", table),
            })?;
        parse_content_range_total(range).ok_or_else(|| SeoError::Api {
            message: format!("{} count response has unusable Content-Range '{}'", table, range),
        })
    }
}

/// "0-24/312" or "*/312" -> 312
fn parse_content_range_total(range: &str) -> Option<u64> {
    range.rsplit_once('/')?.1.trim().parse().ok()
}

/// PostgREST `in` filter with quoted values
fn in_list(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

#[derive(Deserialize)]
struct IdRow {
    #[serde(deserialize_with = "super::id_string")]
    id: String,
}

#[derive(Deserialize)]
struct ProviderIdRow {
    #[serde(deserialize_with = "super::id_string")]
    provider_id: String,
}

#[derive(Deserialize)]
struct RatingRow {
    avg_rating: Option<f64>,
}

#[async_trait]
impl Directory for SupabaseClient {
    #[instrument(skip(self))]
    async fn category_id(&self, category_slug: &str) -> Result<Option<String>> {
        let rows: Vec<IdRow> = self
            .select(
                "categories",
                &[
                    ("select", "id".to_string()),
                    ("slug", eq(category_slug)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next().map(|r| r.id))
    }

    #[instrument(skip(self))]
    async fn region_id(&self, region_name: &str) -> Result<Option<String>> {
        let rows: Vec<IdRow> = self
            .select(
                "regions",
                &[
                    ("select", "id".to_string()),
                    ("name", eq(region_name)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next().map(|r| r.id))
    }

    async fn category_provider_ids(&self, category_id: &str) -> Result<Vec<String>> {
        let rows: Vec<ProviderIdRow> = self
            .select(
                "provider_categories",
                &[("select", "provider_id".to_string()), ("category_id", eq(category_id))],
            )
            .await?;
        Ok(rows.into_iter().map(|r| r.provider_id).collect())
    }

    async fn region_provider_ids(&self, region_id: &str) -> Result<Vec<String>> {
        let rows: Vec<ProviderIdRow> = self
            .select(
                "provider_regions",
                &[("select", "provider_id".to_string()), ("region_id", eq(region_id))],
            )
            .await?;
        Ok(rows.into_iter().map(|r| r.provider_id).collect())
    }

    async fn verified_providers(&self, ids: &[String]) -> Result<Vec<ProviderRow>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        self.select(
            "providers",
            &[
                ("select", PROVIDER_COLUMNS.to_string()),
                ("id", in_list(ids)),
                ("status", eq(VERIFIED_STATUS)),
            ],
        )
        .await
    }

    async fn active_featured(&self, ids: &[String]) -> Result<Vec<FeaturedListingRow>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        self.select(
            "featured_listings",
            &[
                ("select", "provider_id,expires_at".to_string()),
                ("provider_id", in_list(ids)),
                ("status", eq(ACTIVE_LISTING_STATUS)),
            ],
        )
        .await
    }

    async fn categories(&self) -> Result<Vec<NamedRow>> {
        self.select("categories", &[("select", "id,name".to_string())]).await
    }

    async fn regions(&self) -> Result<Vec<NamedRow>> {
        self.select("regions", &[("select", "id,name".to_string())]).await
    }

    async fn provider_categories(&self, ids: &[String]) -> Result<Vec<ProviderCategoryRow>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        self.select(
            "provider_categories",
            &[
                ("select", "provider_id,category_id".to_string()),
                ("provider_id", in_list(ids)),
            ],
        )
        .await
    }

    async fn provider_regions(&self, ids: &[String]) -> Result<Vec<ProviderRegionRow>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        self.select(
            "provider_regions",
            &[
                ("select", "provider_id,region_id".to_string()),
                ("provider_id", in_list(ids)),
            ],
        )
        .await
    }

    async fn count_verified(&self, ids: &[String]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.count(
            "providers",
            &[
                ("select", "id".to_string()),
                ("id", in_list(ids)),
                ("status", eq(VERIFIED_STATUS)),
            ],
        )
        .await
    }

    async fn verified_ratings(&self) -> Result<Vec<f64>> {
        let rows: Vec<RatingRow> = self
            .select(
                "providers",
                &[
                    ("select", "avg_rating".to_string()),
                    ("status", eq(VERIFIED_STATUS)),
                    ("avg_rating", "gt.0".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().filter_map(|r| r.avg_rating).collect())
    }

    #[instrument(skip(self))]
    async fn recent_reviews(&self, service_category: &str, limit: usize) -> Result<Vec<Review>> {
        self.select(
            "reviews",
            &[
                ("select", "*".to_string()),
                ("service_category", eq(service_category)),
                ("order", "created_at.desc".to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn published_posts(
        &self,
        category: &str,
        location: Option<&str>,
        limit: usize,
    ) -> Result<Vec<BlogPost>> {
        let mut query = vec![
            ("select", "*".to_string()),
            ("category", eq(category)),
            ("is_published", "eq.true".to_string()),
            ("order", "published_at.desc".to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(location) = location {
            query.push(("or", format!("(location.eq.{},location.is.null)", location)));
        }
        self.select("blog_posts", &query).await
    }
}
