use axum::{
    http::{HeaderName, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::admin::{approve, content_list, dashboard, login, logout};
use crate::handlers::{
    health, home, metrics, not_found, robots, service_page, service_town_page, sitemap, town_page,
};
use crate::session::require_admin;
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    let admin_api = Router::new()
        .route("/api/admin/content", get(content_list))
        .route("/api/admin/approve", post(approve))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/", get(home))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/admin", get(dashboard))
        .route("/api/admin/login", post(login))
        .route("/api/admin/logout", post(logout))
        .merge(admin_api)
        .route("/town/:town", get(town_page))
        .route("/:service", get(service_page))
        .route("/:service/:town", get(service_town_page))
        .nest_service("/static", ServeDir::new(&state.static_dir))
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-robots-tag"),
            HeaderValue::from_static("index, follow"),
        ))
        .with_state(state)
}
