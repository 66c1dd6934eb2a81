//! Display shapes handed to the templates.

use prohub_core::{BlogPost, CatalogImage, GalleryImage, PageStats, Provider, Review, Service, Town};

const DEFAULT_HERO_IMAGE: &str =
    "https://images.unsplash.com/photo-1581092160607-ee22621dd758?w=1600&h=900&fit=crop&q=80";

/// Head metadata shared by every public page.
#[derive(Debug, Clone)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub site_name: String,
    /// Product app the site links out to (quotes, profiles, policies)
    pub app_url: String,
    pub locale: String,
    pub image: Option<String>,
    /// Serialized JSON-LD documents, already escaped for a `<script>` body
    pub json_ld: Vec<String>,
    pub noindex: bool,
}

#[derive(Debug, Clone)]
pub struct Crumb {
    pub name: String,
    pub href: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone)]
pub struct ProviderCard {
    pub name: String,
    pub initials: String,
    pub avatar_url: Option<String>,
    pub bio: String,
    pub rating: Option<String>,
    pub total_reviews: u32,
    pub years_experience: Option<u32>,
    pub featured: bool,
    pub categories: String,
    pub profile_url: String,
}

impl ProviderCard {
    pub fn from_provider(provider: &Provider, app_url: &str) -> Self {
        Self {
            name: provider.business_name.clone(),
            initials: initials(&provider.business_name),
            avatar_url: provider.avatar_url.clone(),
            bio: provider.bio.clone().unwrap_or_default(),
            rating: provider.avg_rating.filter(|r| *r > 0.0).map(|r| format!("{:.1}", r)),
            total_reviews: provider.total_reviews.unwrap_or(0),
            years_experience: provider.years_experience,
            featured: provider.is_featured,
            categories: provider.categories.join(", "),
            profile_url: format!("{}/provider/{}", app_url.trim_end_matches('/'), provider.id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewCard {
    pub customer_name: String,
    pub stars: String,
    pub rating: u8,
    pub comment: String,
    pub date: String,
    pub verified: bool,
}

impl From<&Review> for ReviewCard {
    fn from(review: &Review) -> Self {
        let rating = review.rating.min(5);
        Self {
            customer_name: review.customer_name.clone(),
            stars: format!("{}{}", "★".repeat(rating as usize), "☆".repeat(5 - rating as usize)),
            rating,
            comment: review.comment.clone(),
            date: review.created_at.format("%-d %b %Y").to_string(),
            verified: review.is_verified_customer,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostCard {
    pub title: String,
    pub excerpt: String,
    pub image_url: Option<String>,
    pub date: String,
    pub href: String,
}

impl PostCard {
    pub fn from_post(post: &BlogPost, app_url: &str) -> Self {
        Self {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            image_url: post.image_url.clone(),
            date: post.published_at.format("%-d %b %Y").to_string(),
            href: format!("{}/blog/{}", app_url.trim_end_matches('/'), post.slug),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatsView {
    pub provider_count: u64,
    pub avg_rating: String,
    pub avg_response_time: String,
    pub jobs_this_month: Option<u64>,
}

impl From<&PageStats> for StatsView {
    fn from(stats: &PageStats) -> Self {
        Self {
            provider_count: stats.provider_count,
            avg_rating: stats.avg_rating.clone().unwrap_or_else(|| "New".to_string()),
            avg_response_time: stats.avg_response_time.clone(),
            jobs_this_month: stats.jobs_this_month,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GalleryItem {
    pub src: String,
    pub alt: String,
    pub caption: String,
    pub description: String,
}

/// Generated gallery when the record has one, else the catalog gallery.
pub fn gallery_items(content_gallery: Option<&[GalleryImage]>, service: &Service) -> Vec<GalleryItem> {
    match content_gallery {
        Some(images) if !images.is_empty() => images
            .iter()
            .map(|img| GalleryItem {
                src: img.url.clone(),
                alt: img.alt.clone(),
                caption: img.caption.clone(),
                description: img.description.clone().unwrap_or_default(),
            })
            .collect(),
        _ => service.images.gallery.iter().map(catalog_item).collect(),
    }
}

fn catalog_item(img: &CatalogImage) -> GalleryItem {
    GalleryItem {
        src: img.src.clone(),
        alt: img.alt.clone(),
        caption: img.caption.clone(),
        description: String::new(),
    }
}

pub fn hero_image(service: &Service) -> String {
    service
        .images
        .hero
        .clone()
        .unwrap_or_else(|| DEFAULT_HERO_IMAGE.to_string())
}

/// Quote request deep link into the app.
pub fn request_url(app_url: &str, service: &Service, town: &Town) -> String {
    format!(
        "{}/request?service={}&location={}",
        app_url.trim_end_matches('/'),
        service.slug,
        town.slug
    )
}

pub fn absolute_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn initials_use_first_two_words() {
        assert_eq!(initials("Garden Route Plumbing"), "GR");
        assert_eq!(initials("sparky"), "S");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn review_stars_clamp_to_five() {
        let review = Review {
            id: "r".into(),
            provider_id: "p".into(),
            customer_name: "Pieter".into(),
            rating: 4,
            comment: "Quick and tidy".into(),
            service_category: "plumber".into(),
            is_verified_customer: true,
            created_at: Utc.with_ymd_and_hms(2026, 3, 7, 10, 0, 0).unwrap(),
        };
        let card = ReviewCard::from(&review);
        assert_eq!(card.stars, "★★★★☆");
        assert_eq!(card.date, "7 Mar 2026");
    }

    #[test]
    fn stats_without_ratings_read_new() {
        let view = StatsView::from(&PageStats::default());
        assert_eq!(view.avg_rating, "New");
        assert_eq!(view.avg_response_time, "< 30 mins");
    }
}
