//! Page composition: catalog + content tiers + directory data into HTML.
//!
//! Shared by the HTTP handlers and the static export.

use askama::Template;
use prohub_core::content::ContentResolver;
use prohub_core::{Catalog, Service, Town};
use prohub_seo::listings::fetch_page_data;
use prohub_seo::metrics::PageMetrics;
use tracing::{debug, instrument};

use crate::error::PageError;
use crate::state::AppState;
use crate::structured_data::{breadcrumb_schema, faq_schema, service_schema, to_script_body};
use crate::templates::{RegionGroup, ServiceIndexTemplate, ServiceTownTemplate, TownIndexTemplate};
use crate::views::{
    absolute_url, gallery_items, hero_image, request_url, Crumb, Link, PageMeta, PostCard, ProviderCard,
    ReviewCard, StatsView,
};

fn meta(state: &AppState, title: String, description: String, path: &str) -> PageMeta {
    let site = &state.ctx.config.site;
    PageMeta {
        title,
        description,
        canonical: absolute_url(&site.base_url, path),
        site_name: site.name.clone(),
        app_url: site.app_url.clone(),
        locale: site.locale.clone(),
        image: None,
        json_ld: Vec::new(),
        noindex: false,
    }
}

fn home_crumb(state: &AppState) -> Crumb {
    Crumb {
        name: "Home".to_string(),
        href: Some(state.ctx.config.site.base_url.clone()),
    }
}

/// "Garden Route & Klein Karoo"
fn region_names(catalog: &Catalog) -> String {
    catalog
        .regions()
        .into_iter()
        .map(|(_, name)| name)
        .collect::<Vec<_>>()
        .join(" & ")
}

fn service_links_in_town(services: &[&Service], town: &Town) -> Vec<Link> {
    services
        .iter()
        .map(|s| Link {
            label: s.name_plural.clone(),
            href: format!("/{}/{}", s.slug, town.slug),
        })
        .collect()
}

#[instrument(skip(state))]
pub async fn render_service_town(state: &AppState, service_slug: &str, town_slug: &str) -> Result<String, PageError> {
    let catalog = &state.ctx.catalog;
    let (Some(service), Some(town)) = (catalog.service(service_slug), catalog.town(town_slug)) else {
        PageMetrics::record_not_found();
        return Err(PageError::NotFound);
    };

    let resolved = ContentResolver::new(state.ctx.store.as_ref())
        .resolve(service, town)
        .await;
    PageMetrics::record_content_source(resolved.source.as_str());
    debug!("Serving {:?} content for {}/{}", resolved.source, service.slug, town.slug);
    let content = resolved.content;

    let data = fetch_page_data(state.ctx.directory.as_ref(), catalog, &service.slug, &town.slug).await;

    let site = &state.ctx.config.site;
    let path = format!("/{}/{}", service.slug, town.slug);
    let crumbs = vec![
        home_crumb(state),
        Crumb {
            name: service.name_plural.clone(),
            href: Some(format!("/{}", service.slug)),
        },
        Crumb {
            name: town.name.clone(),
            href: Some(path.clone()),
        },
    ];

    let hero = hero_image(service);
    let mut page_meta = meta(state, content.title.clone(), content.description.clone(), &path);
    page_meta.image = Some(hero.clone());
    page_meta.json_ld = vec![
        to_script_body(&service_schema(&site.name, &site.base_url, service, town)),
        to_script_body(&breadcrumb_schema(&site.base_url, &crumbs)),
        to_script_body(&faq_schema(&content.faqs)),
    ];

    let related = catalog.related_services(&service.slug);
    let template = ServiceTownTemplate {
        meta: page_meta,
        providers: data
            .providers
            .iter()
            .map(|p| ProviderCard::from_provider(p, &site.app_url))
            .collect(),
        reviews: data.reviews.iter().map(ReviewCard::from).collect(),
        posts: data
            .posts
            .iter()
            .map(|p| PostCard::from_post(p, &site.app_url))
            .collect(),
        stats: StatsView::from(&data.stats),
        gallery: gallery_items(content.gallery.as_deref(), service),
        nearby: catalog
            .nearby_towns(&town.slug)
            .into_iter()
            .map(|t| Link {
                label: t.name.clone(),
                href: format!("/{}/{}", service.slug, t.slug),
            })
            .collect(),
        related: service_links_in_town(&related, town),
        request_url: request_url(&site.app_url, service, town),
        hero_image: hero,
        crumbs,
        service: service.clone(),
        town: town.clone(),
        content,
    };

    let html = template.render()?;
    PageMetrics::record_page_rendered("service_town");
    Ok(html)
}

pub fn render_service_index(state: &AppState, service_slug: &str) -> Result<String, PageError> {
    let catalog = &state.ctx.catalog;
    let Some(service) = catalog.service(service_slug) else {
        PageMetrics::record_not_found();
        return Err(PageError::NotFound);
    };

    let site = &state.ctx.config.site;
    let path = format!("/{}", service.slug);
    let regions = region_names(catalog);
    let plural_lower = service.name_plural.to_lowercase();
    let sample_towns: Vec<&str> = catalog.towns().iter().take(3).map(|t| t.name.as_str()).collect();

    let crumbs = vec![
        home_crumb(state),
        Crumb {
            name: service.name_plural.clone(),
            href: Some(path.clone()),
        },
    ];

    let mut page_meta = meta(
        state,
        format!("{} in {} | {}", service.name_plural, regions, site.name),
        format!(
            "Find verified {} across the {}. Compare quotes from local {} in {}, and more.",
            plural_lower,
            regions,
            plural_lower,
            sample_towns.join(", ")
        ),
        &path,
    );
    page_meta.json_ld = vec![to_script_body(&breadcrumb_schema(&site.base_url, &crumbs))];
    let hero = hero_image(service);
    page_meta.image = Some(hero.clone());

    let template = ServiceIndexTemplate {
        meta: page_meta,
        crumbs,
        hero_image: hero,
        regions: catalog
            .regions()
            .into_iter()
            .map(|(region_slug, name)| RegionGroup {
                name: name.to_string(),
                towns: catalog
                    .towns_by_region(region_slug)
                    .into_iter()
                    .map(|t| Link {
                        label: t.name.clone(),
                        href: format!("/{}/{}", service.slug, t.slug),
                    })
                    .collect(),
            })
            .collect(),
        related: catalog
            .related_services(&service.slug)
            .into_iter()
            .map(|s| Link {
                label: s.name_plural.clone(),
                href: format!("/{}", s.slug),
            })
            .collect(),
        service: service.clone(),
    };

    let html = template.render()?;
    PageMetrics::record_page_rendered("service");
    Ok(html)
}

pub fn render_town_index(state: &AppState, town_slug: &str) -> Result<String, PageError> {
    let catalog = &state.ctx.catalog;
    let Some(town) = catalog.town(town_slug) else {
        PageMetrics::record_not_found();
        return Err(PageError::NotFound);
    };

    let site = &state.ctx.config.site;
    let path = format!("/town/{}", town.slug);
    let crumbs = vec![
        home_crumb(state),
        Crumb {
            name: town.name.clone(),
            href: Some(path.clone()),
        },
    ];

    let mut page_meta = meta(
        state,
        format!("Local Services in {}, {} | {}", town.name, town.region, site.name),
        format!(
            "Find verified local service providers in {}. Plumbers, electricians, pest control, and more. Get free quotes from trusted professionals.",
            town.name
        ),
        &path,
    );
    page_meta.json_ld = vec![to_script_body(&breadcrumb_schema(&site.base_url, &crumbs))];

    let services: Vec<&Service> = catalog.services().iter().collect();
    let template = TownIndexTemplate {
        meta: page_meta,
        crumbs,
        services: service_links_in_town(&services, town),
        nearby: catalog
            .nearby_towns(&town.slug)
            .into_iter()
            .map(|t| Link {
                label: t.name.clone(),
                href: format!("/town/{}", t.slug),
            })
            .collect(),
        request_url: format!(
            "{}/request?location={}",
            site.app_url.trim_end_matches('/'),
            town.slug
        ),
        town: town.clone(),
    };

    let html = template.render()?;
    PageMetrics::record_page_rendered("town");
    Ok(html)
}

pub fn robots_txt(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /api/\n\nSitemap: {}/sitemap.xml\n",
        base_url.trim_end_matches('/')
    )
}
