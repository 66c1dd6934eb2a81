use askama::Template;
use prohub_core::{PageContent, Service, Town};

use crate::views::{Crumb, GalleryItem, Link, PageMeta, PostCard, ProviderCard, ReviewCard, StatsView};

#[derive(Template)]
#[template(path = "service_town.html")]
pub struct ServiceTownTemplate {
    pub meta: PageMeta,
    pub crumbs: Vec<Crumb>,
    pub service: Service,
    pub town: Town,
    pub content: PageContent,
    pub hero_image: String,
    pub request_url: String,
    pub providers: Vec<ProviderCard>,
    pub reviews: Vec<ReviewCard>,
    pub posts: Vec<PostCard>,
    pub stats: StatsView,
    pub gallery: Vec<GalleryItem>,
    pub nearby: Vec<Link>,
    pub related: Vec<Link>,
}

pub struct RegionGroup {
    pub name: String,
    pub towns: Vec<Link>,
}

#[derive(Template)]
#[template(path = "service.html")]
pub struct ServiceIndexTemplate {
    pub meta: PageMeta,
    pub crumbs: Vec<Crumb>,
    pub service: Service,
    pub hero_image: String,
    pub regions: Vec<RegionGroup>,
    pub related: Vec<Link>,
}

#[derive(Template)]
#[template(path = "town.html")]
pub struct TownIndexTemplate {
    pub meta: PageMeta,
    pub crumbs: Vec<Crumb>,
    pub town: Town,
    pub services: Vec<Link>,
    pub nearby: Vec<Link>,
    pub request_url: String,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub meta: PageMeta,
    pub admin_enabled: bool,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub meta: PageMeta,
}

impl Default for NotFoundTemplate {
    fn default() -> Self {
        Self {
            meta: PageMeta {
                title: "Page not found | ProHub".to_string(),
                description: "The page you were looking for does not exist.".to_string(),
                canonical: String::new(),
                site_name: "ProHub".to_string(),
                app_url: "https://app.prohub.co.za".to_string(),
                locale: "en_ZA".to_string(),
                image: None,
                json_ld: Vec::new(),
                noindex: true,
            },
        }
    }
}
