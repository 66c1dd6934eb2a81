use httpmock::prelude::*;
use prohub_seo::directory::{Directory, SupabaseClient};
use serde_json::json;
use std::time::Duration;

const ANON_KEY: &str = "anon-test-key";

fn client(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(&server.base_url(), ANON_KEY, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn category_lookup_sends_auth_headers_and_eq_filter() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/categories")
                .query_param("slug", "eq.plumbers")
                .query_param("select", "id")
                .header("apikey", ANON_KEY)
                .header("authorization", format!("Bearer {}", ANON_KEY));
            then.status(200).json_body(json!([{ "id": "cat-1" }]));
        })
        .await;

    let id = client(&server).category_id("plumbers").await.unwrap();

    mock.assert_async().await;
    assert_eq!(id.as_deref(), Some("cat-1"));
}

#[tokio::test]
async fn missing_region_is_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/regions")
                .query_param("name", "eq.Mossel Bay");
            then.status(200).json_body(json!([]));
        })
        .await;

    let id = client(&server).region_id("Mossel Bay").await.unwrap();
    assert!(id.is_none());
}

#[tokio::test]
async fn verified_providers_filter_by_status() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/providers")
                .query_param("status", "eq.verified")
                .query_param_exists("id");
            then.status(200).json_body(json!([
                {
                    "id": "p-1",
                    "business_name": "Garden Route Plumbing",
                    "avatar_url": null,
                    "cover_image_url": null,
                    "description": "Burst pipes and geysers",
                    "years_experience": 12,
                    "status": "verified",
                    "avg_rating": 4.8,
                    "total_reviews": 31,
                    "created_at": "2025-03-01T10:00:00+00:00"
                }
            ]));
        })
        .await;

    let rows = client(&server)
        .verified_providers(&["p-1".to_string(), "p-2".to_string()])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].business_name, "Garden Route Plumbing");
    assert_eq!(rows[0].years_experience, Some(12));
}

#[tokio::test]
async fn empty_id_lists_skip_the_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.path_contains("/rest/v1/");
            then.status(500);
        })
        .await;

    let client = client(&server);
    assert!(client.verified_providers(&[]).await.unwrap().is_empty());
    assert!(client.active_featured(&[]).await.unwrap().is_empty());
    assert_eq!(client.count_verified(&[]).await.unwrap(), 0);

    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn count_reads_content_range() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::HEAD)
                .path("/rest/v1/providers")
                .header("prefer", "count=exact");
            then.status(200).header("Content-Range", "*/4");
        })
        .await;

    let count = client(&server)
        .count_verified(&["p-1".to_string()])
        .await
        .unwrap();
    assert_eq!(count, 4);
}

#[tokio::test]
async fn reviews_are_ordered_and_limited() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/reviews")
                .query_param("service_category", "eq.plumber")
                .query_param("order", "created_at.desc")
                .query_param("limit", "6");
            then.status(200).json_body(json!([
                {
                    "id": "r-1",
                    "provider_id": "p-1",
                    "customer_name": "Thandi",
                    "rating": 5,
                    "comment": "Arrived within the hour",
                    "service_category": "plumber",
                    "is_verified_customer": true,
                    "created_at": "2026-02-14T09:30:00Z"
                },
                {
                    "id": 812,
                    "provider_id": 17,
                    "customer_name": null,
                    "rating": 4,
                    "comment": null,
                    "service_category": "plumber",
                    "is_verified_customer": null,
                    "created_at": "2026-02-10T16:05:00Z"
                }
            ]));
        })
        .await;

    let reviews = client(&server).recent_reviews("plumber", 6).await.unwrap();

    mock.assert_async().await;
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].rating, 5);
    // nullable columns come back as null rather than missing
    assert_eq!(reviews[1].id, "812");
    assert_eq!(reviews[1].provider_id, "17");
    assert_eq!(reviews[1].comment, "");
    assert!(!reviews[1].is_verified_customer);
}

#[tokio::test]
async fn posts_include_town_or_unlocated() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/blog_posts")
                .query_param("category", "eq.plumber")
                .query_param("is_published", "eq.true")
                .query_param("or", "(location.eq.george,location.is.null)");
            then.status(200).json_body(json!([
                {
                    "id": 31,
                    "title": "Winter geyser care",
                    "slug": "winter-geyser-care",
                    "excerpt": null,
                    "content": null,
                    "image_url": null,
                    "category": "plumber",
                    "location": null,
                    "published_at": "2026-01-20T08:00:00Z"
                }
            ]));
        })
        .await;

    let posts = client(&server)
        .published_posts("plumber", Some("george"), 3)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "31");
    assert_eq!(posts[0].excerpt, "");
    assert!(posts[0].location.is_none());
}

#[tokio::test]
async fn non_success_status_is_an_api_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/categories");
            then.status(401).body(r#"{"message":"Invalid API key"}"#);
        })
        .await;

    let err = client(&server).category_id("plumbers").await.unwrap_err();
    assert!(err.to_string().contains("401"), "{}", err);
}
