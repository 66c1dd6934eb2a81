use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use prohub_core::content::{generate_default_content, stage_content};
use prohub_core::{Catalog, ContentKey, ContentStatus, ContentStore, FileContentStore};
use prohub_seo::config::Config;
use prohub_seo::directory::InMemoryDirectory;
use prohub_seo::AppContext;
use prohub_web::{app_router, AppState};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const PASSWORD: &str = "s3cret";

struct TestApp {
    router: Router,
    store: Arc<FileContentStore>,
    catalog: Catalog,
    _dir: TempDir,
}

fn repo_catalog() -> Catalog {
    Catalog::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("../data")).unwrap()
}

fn test_app(password: Option<&str>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileContentStore::new(dir.path()));

    let mut config = Config::default();
    config.admin.password = password.map(str::to_string);

    let ctx = AppContext::new(
        config,
        repo_catalog(),
        store.clone(),
        Arc::new(InMemoryDirectory::empty()),
    );
    TestApp {
        router: app_router(AppState::new(ctx)),
        store,
        catalog: repo_catalog(),
        _dir: dir,
    }
}

async fn get(router: &Router, uri: &str) -> axum::response::Response {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(router: &Router, uri: &str, token: Option<&str>, body: Value) -> axum::response::Response {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    router
        .clone()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

async fn login(router: &Router) -> String {
    let response = post_json(router, "/api/admin/login", None, json!({ "password": PASSWORD })).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

async fn stage(app: &TestApp, service: &str, town: &str) {
    let content = generate_default_content(
        app.catalog.service(service).unwrap(),
        app.catalog.town(town).unwrap(),
        Utc::now(),
    );
    let key = ContentKey::new(service, town).unwrap();
    stage_content(app.store.as_ref(), &key, content).await.unwrap();
}

#[tokio::test]
async fn service_town_page_renders_with_cache_headers() {
    let app = test_app(None);
    let response = get(&app.router, "/plumber/george").await;

    assert_eq!(response.status(), StatusCode::OK);
    let cache = response.headers()[header::CACHE_CONTROL].to_str().unwrap().to_string();
    assert_eq!(cache, "public, max-age=86400, stale-while-revalidate=86400");
    assert_eq!(response.headers()["x-robots-tag"], "index, follow");

    let html = body_string(response).await;
    assert!(html.contains("George"));
    assert!(html.contains("application/ld+json"));
    assert!(html.contains("https://prohub.co.za/plumber/george"));
    assert!(html.contains("\"FAQPage\""));
}

#[tokio::test]
async fn pending_content_is_served_before_approval() {
    let app = test_app(None);
    let mut content = generate_default_content(
        app.catalog.service("plumber").unwrap(),
        app.catalog.town("george").unwrap(),
        Utc::now(),
    );
    content.title = "Staged Plumbers in George".to_string();
    let key = ContentKey::new("plumber", "george").unwrap();
    stage_content(app.store.as_ref(), &key, content).await.unwrap();

    let html = body_string(get(&app.router, "/plumber/george").await).await;
    assert!(html.contains("<title>Staged Plumbers in George</title>"));
}

#[tokio::test]
async fn index_pages_render() {
    let app = test_app(None);

    let response = get(&app.router, "/plumber").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("/plumber/george"));

    let response = get(&app.router, "/town/george").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Local Services in George"));
    assert!(html.contains("/plumber/george"));
}

#[tokio::test]
async fn unknown_slugs_are_not_found() {
    let app = test_app(None);
    for uri in ["/plumber/atlantis", "/not-a-service", "/not-a-service/george", "/town/atlantis", "/a/b/c"] {
        let response = get(&app.router, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(response.headers()["x-robots-tag"], "index, follow");
    }
}

#[tokio::test]
async fn sitemap_and_robots() {
    let app = test_app(None);

    let response = get(&app.router, "/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");
    let xml = body_string(response).await;
    let services = app.catalog.services().len();
    let towns = app.catalog.towns().len();
    assert_eq!(xml.matches("<url>").count(), services * towns + services + towns);
    assert!(xml.contains("<loc>https://prohub.co.za/plumber/george</loc>"));

    let robots = body_string(get(&app.router, "/robots.txt").await).await;
    assert!(robots.contains("Disallow: /admin"));
    assert!(robots.contains("Sitemap: https://prohub.co.za/sitemap.xml"));
}

#[tokio::test]
async fn root_redirects_to_app() {
    let app = test_app(None);
    let response = get(&app.router, "/").await;

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "https://app.prohub.co.za");
}

#[tokio::test]
async fn health_reports_catalog_size() {
    let app = test_app(None);
    let body = body_json(get(&app.router, "/health").await).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"], app.catalog.services().len());
}

#[tokio::test]
async fn admin_api_is_disabled_without_password() {
    let app = test_app(None);

    let response = get(&app.router, "/api/admin/content").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = post_json(&app.router, "/api/admin/login", None, json!({ "password": "" })).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let html = body_string(get(&app.router, "/admin").await).await;
    assert!(html.contains("Admin access is disabled"));
}

#[tokio::test]
async fn login_issues_session_token() {
    let app = test_app(Some(PASSWORD));

    let response = post_json(&app.router, "/api/admin/login", None, json!({ "password": "wrong" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Unauthorized");

    let response = post_json(&app.router, "/api/admin/login", None, json!({ "password": PASSWORD })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("prohub_admin="));
    assert!(cookie.contains("HttpOnly"));
    let body = body_json(response).await;
    assert_eq!(body["token"].as_str().unwrap().len(), 64);
    assert!(body["expiresAt"].is_string());
}

#[tokio::test]
async fn content_list_requires_session() {
    let app = test_app(Some(PASSWORD));
    stage(&app, "plumber", "george").await;

    let response = get(&app.router, "/api/admin/content").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // the password itself is not a token
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/content")
                .header(header::AUTHORIZATION, format!("Bearer {}", PASSWORD))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = login(&app.router).await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/content")
                .header(header::COOKIE, format!("prohub_admin={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["summary"]["pending"], 1);
    assert_eq!(body["items"][0]["service"], "plumber");
    assert_eq!(body["items"][0]["status"], "pending");
}

#[tokio::test]
async fn approve_validates_and_promotes() {
    let app = test_app(Some(PASSWORD));
    let token = login(&app.router).await;

    let response = post_json(&app.router, "/api/admin/approve", None, json!({ "service": "plumber", "town": "george" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(&app.router, "/api/admin/approve", Some(&token), json!({ "service": "plumber" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app.router,
        "/api/admin/approve",
        Some(&token),
        json!({ "service": "../../etc", "town": "george" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(&app.router, "/api/admin/approve", Some(&token), json!({ "service": "plumber", "town": "george" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Content not found in pending");

    stage(&app, "plumber", "george").await;
    let response = post_json(&app.router, "/api/admin/approve", Some(&token), json!({ "service": "plumber", "town": "george" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Approved plumber/george");

    let key = ContentKey::new("plumber", "george").unwrap();
    let live = app.store.get(ContentStatus::Live, &key).await.unwrap().unwrap();
    assert_eq!(live.status, ContentStatus::Live);
    assert!(live.approved_at.is_some());
    assert!(app.store.get(ContentStatus::Pending, &key).await.unwrap().is_none());
}

#[tokio::test]
async fn logout_revokes_token() {
    let app = test_app(Some(PASSWORD));
    let token = login(&app.router).await;

    let response = post_json(&app.router, "/api/admin/logout", Some(&token), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/content")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sitemap_requests_are_counted() {
    prohub_seo::metrics::init_metrics();
    let app = test_app(None);

    assert_eq!(get(&app.router, "/sitemap.xml").await.status(), StatusCode::OK);

    let response = get(&app.router, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("kind=\"sitemap\""), "{}", body);
}

#[tokio::test]
async fn malformed_admin_bodies_get_json_errors() {
    let app = test_app(Some(PASSWORD));
    let token = login(&app.router).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/approve")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/login")
                .body(Body::from("password=s3cret"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn pages_carry_the_cookie_banner() {
    let app = test_app(None);
    let html = body_string(get(&app.router, "/town/george").await).await;

    assert!(html.contains("id=\"cookie-consent\""));
    assert!(html.contains("https://app.prohub.co.za/cookies"));
}
