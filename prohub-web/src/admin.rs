//! Admin dashboard and JSON API for approving generated content.

use askama::Template;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use prohub_core::content::approval::{approve_content, list_content, ContentListItem, ContentSummary};
use prohub_core::ContentKey;
use prohub_seo::metrics::AdminMetrics;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::error::{ApiError, PageError};
use crate::session::{password_matches, token_from_headers, SESSION_COOKIE};
use crate::state::AppState;
use crate::templates::AdminTemplate;
use crate::views::{absolute_url, PageMeta};

pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let site = &state.ctx.config.site;
    let template = AdminTemplate {
        meta: PageMeta {
            title: format!("Content Approval | {}", site.name),
            description: "Review and approve generated page content.".to_string(),
            canonical: absolute_url(&site.base_url, "/admin"),
            site_name: site.name.clone(),
            app_url: site.app_url.clone(),
            locale: site.locale.clone(),
            image: None,
            json_ld: Vec::new(),
            noindex: true,
        },
        admin_enabled: state.ctx.config.admin_password().is_some(),
    };
    Ok(Html(template.render()?))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<Utc>,
}

fn session_cookie(value: &str, max_age: i64) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        SESSION_COOKIE, value, max_age
    ))
    .ok()
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let Some(expected) = state.ctx.config.admin_password() else {
        return Err(ApiError::AdminDisabled);
    };

    if !password_matches(expected, &request.password) {
        AdminMetrics::record_login(false);
        warn!("Rejected admin login");
        return Err(ApiError::Unauthorized);
    }

    let session = state.sessions.issue(Utc::now());
    AdminMetrics::record_login(true);
    info!("Admin session issued, expires {}", session.expires_at);

    let mut response = Json(LoginResponse {
        token: session.token.clone(),
        expires_at: session.expires_at,
    })
    .into_response();
    if let Some(cookie) = session_cookie(&session.token, state.sessions.ttl().num_seconds()) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    Ok(response)
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = token_from_headers(&headers) {
        if state.sessions.revoke(&token) {
            info!("Admin session revoked");
        }
    }

    let mut response = Json(json!({ "success": true })).into_response();
    if let Some(cookie) = session_cookie("", 0) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

#[derive(Debug, Serialize)]
pub struct ContentListResponse {
    pub items: Vec<ContentListItem>,
    pub summary: ContentSummary,
}

pub async fn content_list(State(state): State<AppState>) -> Result<Json<ContentListResponse>, ApiError> {
    let items = list_content(&state.ctx.catalog, state.ctx.store.as_ref()).await?;
    let summary = ContentSummary::from_items(&items);
    Ok(Json(ContentListResponse { items, summary }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ApproveRequest {
    pub service: Option<String>,
    pub town: Option<String>,
}

#[instrument(skip(state, payload))]
pub async fn approve(
    State(state): State<AppState>,
    payload: Result<Json<ApproveRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(request) = payload?;
    let (Some(service), Some(town)) = (
        request.service.filter(|s| !s.is_empty()),
        request.town.filter(|t| !t.is_empty()),
    ) else {
        return Err(ApiError::BadRequest("Missing service or town".to_string()));
    };

    let key = ContentKey::new(service.as_str(), town.as_str())?;
    match approve_content(state.ctx.store.as_ref(), &key).await {
        Ok(_) => {
            AdminMetrics::record_approval(true);
            Ok(Json(json!({
                "success": true,
                "message": format!("Approved {}/{}", service, town),
            })))
        }
        Err(e) => {
            AdminMetrics::record_approval(false);
            Err(e.into())
        }
    }
}
