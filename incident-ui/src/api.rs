//! Authenticated JSON transport to the coordination API.
//!
//! Every call resolves the bearer token at request time, prefixes the
//! configured base URL, and decodes responses into the typed records
//! from `incident_core`. Failures collapse onto [`ApiError`] so views
//! can branch on a status code instead of matching message strings.

use incident_core::actions::{CommentOnIncident, CreateIncident, EditIncident, TransitionIncident};
use incident_core::attachment::Attachment;
use incident_core::event::IncidentEvent;
use incident_core::incident::Incident;
use incident_core::org::{OrgProfile, RegisterOrg};
use incident_core::stats::{AdminStats, Analytics, AnalyticsWindow};
use incident_core::upload::{CompleteAttachment, SignAttachment, SignedUpload};
use incident_core::user::{ChangeUserRole, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::session;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Deployments may point the client elsewhere by defining this global
/// on `window` before the bundle loads.
const API_URL_GLOBAL: &str = "INCIDENTFLOW_API_URL";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("No active session")]
    NoSession,
    #[error("{detail}")]
    Status { status: u16, detail: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        self.status() == Some(403)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub fn api_base() -> String {
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(API_URL_GLOBAL))
        .ok()
        .and_then(|value| value.as_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

fn into_network(err: JsValue) -> ApiError {
    ApiError::Network(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn browser_window() -> Result<web_sys::Window, ApiError> {
    web_sys::window().ok_or_else(|| ApiError::Network("no window object".to_string()))
}

/// FastAPI-style error bodies carry the message under `detail`.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(|s| s.to_string())
}

async fn status_error(response: &Response) -> ApiError {
    let status = response.status();
    let detail = match response.text() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .ok()
            .and_then(|value| value.as_string())
            .and_then(|body| extract_detail(&body)),
        Err(_) => None,
    };
    ApiError::Status {
        status,
        detail: detail.unwrap_or_else(|| format!("Request failed (HTTP {status})")),
    }
}

async fn perform(method: &str, path: &str, body: Option<String>) -> Result<Response, ApiError> {
    let token = session::access_token().ok_or(ApiError::NoSession)?;

    let headers = Headers::new().map_err(into_network)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(into_network)?;
    headers
        .set("Authorization", &format!("Bearer {token}"))
        .map_err(into_network)?;

    let init = RequestInit::new();
    init.set_method(method);
    init.set_headers(&JsValue::from(headers));
    if let Some(body) = body {
        init.set_body(&JsValue::from_str(&body));
    }

    let url = format!("{}{}", api_base(), path);
    let request = Request::new_with_str_and_init(&url, &init).map_err(into_network)?;
    let response = JsFuture::from(browser_window()?.fetch_with_request(&request))
        .await
        .map_err(into_network)?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| ApiError::Decode("not a fetch response".to_string()))?;

    if response.ok() {
        Ok(response)
    } else {
        Err(status_error(&response).await)
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let promise = response
        .json()
        .map_err(|_| ApiError::Decode("response body is not JSON".to_string()))?;
    let value = JsFuture::from(promise).await.map_err(into_network)?;
    serde_wasm_bindgen::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}

async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let response = perform("GET", path, None).await?;
    decode_json(response).await
}

async fn send_json<B: Serialize>(method: &str, path: &str, body: &B) -> Result<Response, ApiError> {
    let body = serde_json::to_string(body).map_err(|err| ApiError::Decode(err.to_string()))?;
    perform(method, path, Some(body)).await
}

// ── Incidents ────────────────────────────────────────────────────────

pub async fn fetch_incidents() -> Result<Vec<Incident>, ApiError> {
    get_json("/incidents").await
}

pub async fn create_incident(body: &CreateIncident) -> Result<(), ApiError> {
    send_json("POST", "/incidents", body).await.map(|_| ())
}

pub async fn update_incident(id: &str, body: &EditIncident) -> Result<(), ApiError> {
    send_json("PATCH", &format!("/incidents/{id}"), body)
        .await
        .map(|_| ())
}

pub async fn delete_incident(id: &str) -> Result<(), ApiError> {
    perform("DELETE", &format!("/incidents/{id}"), None)
        .await
        .map(|_| ())
}

pub async fn transition_incident(id: &str, body: &TransitionIncident) -> Result<(), ApiError> {
    send_json("POST", &format!("/incidents/{id}/transition"), body)
        .await
        .map(|_| ())
}

pub async fn comment_on_incident(id: &str, body: &CommentOnIncident) -> Result<(), ApiError> {
    send_json("POST", &format!("/incidents/{id}/comment"), body)
        .await
        .map(|_| ())
}

pub async fn fetch_events(id: &str) -> Result<Vec<IncidentEvent>, ApiError> {
    get_json(&format!("/incidents/{id}/events")).await
}

// ── Attachments ──────────────────────────────────────────────────────

pub async fn fetch_attachments(id: &str) -> Result<Vec<Attachment>, ApiError> {
    get_json(&format!("/incidents/{id}/attachments")).await
}

pub async fn sign_attachment(id: &str, body: &SignAttachment) -> Result<SignedUpload, ApiError> {
    let response = send_json("POST", &format!("/incidents/{id}/attachments/sign"), body).await?;
    decode_json(response).await
}

pub async fn complete_attachment(id: &str, body: &CompleteAttachment) -> Result<(), ApiError> {
    send_json("POST", &format!("/incidents/{id}/attachments/complete"), body)
        .await
        .map(|_| ())
}

pub async fn delete_attachment(incident_id: &str, attachment_id: &str) -> Result<(), ApiError> {
    perform(
        "DELETE",
        &format!("/incidents/{incident_id}/attachments/{attachment_id}"),
        None,
    )
    .await
    .map(|_| ())
}

// ── Members and org ──────────────────────────────────────────────────

pub async fn fetch_users() -> Result<Vec<User>, ApiError> {
    get_json("/users").await
}

pub async fn change_user_role(id: &str, body: &ChangeUserRole) -> Result<(), ApiError> {
    send_json("PATCH", &format!("/users/{id}/role"), body)
        .await
        .map(|_| ())
}

pub async fn delete_user(id: &str) -> Result<(), ApiError> {
    perform("DELETE", &format!("/users/{id}"), None)
        .await
        .map(|_| ())
}

pub async fn fetch_org_profile() -> Result<OrgProfile, ApiError> {
    get_json("/orgs/org_profile").await
}

pub async fn register_org(body: &RegisterOrg) -> Result<(), ApiError> {
    send_json("POST", "/orgs/register", body).await.map(|_| ())
}

// ── Admin analytics ──────────────────────────────────────────────────

pub async fn fetch_admin_stats() -> Result<AdminStats, ApiError> {
    get_json("/admin/stats").await
}

/// Analytics for the backend's default lookback window.
pub async fn fetch_analytics() -> Result<Analytics, ApiError> {
    get_json("/admin/analytics").await
}

/// Analytics for an explicit window; only the supported windows are
/// representable, so no arbitrary `days` value can reach the API.
pub async fn fetch_analytics_window(window: AnalyticsWindow) -> Result<Analytics, ApiError> {
    get_json(&format!("/admin/charts?days={}", window.days())).await
}
