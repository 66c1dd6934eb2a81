use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::error::{ContentError, Result};
use crate::common::serde_ext::{id_string, null_as_default};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub slug: String,
    pub name: String,
    pub name_plural: String,
    pub category: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub meta_title: String,
    pub meta_description: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    #[serde(default)]
    pub pricing: Vec<PriceItem>,
    #[serde(default)]
    pub diy_vs_pro: Vec<DiyVsProRow>,
    #[serde(default)]
    pub images: ServiceImages,
    #[serde(default)]
    pub related_services: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceItem {
    #[serde(rename = "service")]
    pub label: String,
    pub range: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiyVsProRow {
    pub task: String,
    pub description: String,
    pub diy: DiyFeasible,
    pub pro: ProUrgency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiyFeasible {
    Yes,
    No,
}

impl DiyFeasible {
    pub fn label(&self) -> &'static str {
        match self {
            DiyFeasible::Yes => "Yes",
            DiyFeasible::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProUrgency {
    Urgent,
    Required,
    IfPersistent,
    Optional,
}

impl ProUrgency {
    pub fn label(&self) -> &'static str {
        match self {
            ProUrgency::Urgent => "Urgent",
            ProUrgency::Required => "Required",
            ProUrgency::IfPersistent => "If persistent",
            ProUrgency::Optional => "Optional",
        }
    }

    /// Urgent and required rows are highlighted on the comparison table.
    pub fn is_emphasized(&self) -> bool {
        matches!(self, ProUrgency::Urgent | ProUrgency::Required)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceImages {
    #[serde(default)]
    pub hero: Option<String>,
    #[serde(default)]
    pub gallery: Vec<CatalogImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogImage {
    pub src: String,
    pub alt: String,
    pub caption: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Town {
    pub slug: String,
    pub name: String,
    pub region: String,
    pub region_slug: String,
    pub province: String,
    #[serde(default)]
    pub nearby_towns: Vec<String>,
    #[serde(default)]
    pub local_areas: Vec<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Pending,
    Live,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Pending => "pending",
            ContentStatus::Live => "live",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    pub alt: String,
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub title: String,
    pub description: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    #[serde(default)]
    pub guide_intro: String,
    #[serde(default)]
    pub guide_service_types: String,
    #[serde(default)]
    pub guide_diy_vs_pro: String,
    #[serde(default)]
    pub guide_what_to_expect: String,
    #[serde(default)]
    pub guide_choosing_provider: String,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<GalleryImage>>,
    #[serde(default = "pending_status")]
    pub status: ContentStatus,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

fn pending_status() -> ContentStatus {
    ContentStatus::Pending
}

/// Validated (service, town) pair used to address a content record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey {
    service: String,
    town: String,
}

impl ContentKey {
    pub fn new(service: impl Into<String>, town: impl Into<String>) -> Result<Self> {
        let service = service.into();
        let town = town.into();
        validate_slug(&service)?;
        validate_slug(&town)?;
        Ok(Self { service, town })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn town(&self) -> &str {
        &self.town
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.town)
    }
}

/// Slugs double as path segments, so only `[a-z0-9-]` is accepted.
pub fn validate_slug(slug: &str) -> Result<()> {
    let invalid = |reason: &str| ContentError::InvalidSlug {
        slug: slug.to_string(),
        reason: reason.to_string(),
    };

    if slug.is_empty() {
        return Err(invalid("empty"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(invalid("leading or trailing hyphen"));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid("only lowercase letters, digits and hyphens are allowed"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub business_name: String,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub bio: Option<String>,
    pub years_experience: Option<u32>,
    pub is_verified: bool,
    pub is_featured: bool,
    pub featured_until: Option<DateTime<Utc>>,
    pub avg_rating: Option<f64>,
    pub total_reviews: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    pub regions: Vec<String>,
}

impl Provider {
    pub fn rating_or_zero(&self) -> f64 {
        self.avg_rating.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub provider_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    pub rating: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    pub service_category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_verified_customer: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: String,
    #[serde(default)]
    pub location: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStats {
    pub provider_count: u64,
    pub avg_rating: Option<String>,
    pub avg_response_time: String,
    pub jobs_this_month: Option<u64>,
}

impl Default for PageStats {
    fn default() -> Self {
        Self {
            provider_count: 0,
            avg_rating: None,
            avg_response_time: "< 30 mins".to_string(),
            jobs_this_month: None,
        }
    }
}
