use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use prohub_core::paths::{render_sitemap, site_paths};
use prohub_seo::metrics::PageMetrics;
use serde_json::json;

use crate::error::PageError;
use crate::pages::{render_service_index, render_service_town, render_town_index, robots_txt};
use crate::state::AppState;

fn cached_page(state: &AppState, html: String) -> Response {
    let secs = state.ctx.config.site.revalidate_secs;
    let mut response = Html(html).into_response();
    if let Ok(value) = HeaderValue::from_str(&format!(
        "public, max-age={}, stale-while-revalidate={}",
        secs, secs
    )) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}

pub async fn home(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.ctx.config.site.app_url)
}

pub async fn service_page(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Result<Response, PageError> {
    let html = render_service_index(&state, &service)?;
    Ok(cached_page(&state, html))
}

pub async fn service_town_page(
    State(state): State<AppState>,
    Path((service, town)): Path<(String, String)>,
) -> Result<Response, PageError> {
    let html = render_service_town(&state, &service, &town).await?;
    Ok(cached_page(&state, html))
}

pub async fn town_page(
    State(state): State<AppState>,
    Path(town): Path<String>,
) -> Result<Response, PageError> {
    let html = render_town_index(&state, &town)?;
    Ok(cached_page(&state, html))
}

pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let paths = site_paths(&state.ctx.catalog);
    let xml = render_sitemap(&state.ctx.config.site.base_url, &paths, Utc::now());
    PageMetrics::record_page_rendered("sitemap");
    ([(header::CONTENT_TYPE, "application/xml")], xml)
}

pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.ctx.config.site.base_url),
    )
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "services": state.ctx.catalog.services().len(),
        "towns": state.ctx.catalog.towns().len(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn metrics() -> Response {
    match prohub_seo::metrics::render() {
        Some(body) => ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

pub async fn not_found() -> PageError {
    PageError::NotFound
}

