//! `/api/*` forwarder
//!
//! The browser talks to the portal's own origin; this router relays those
//! calls to the configured backend and hands the answer back unchanged.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::any,
};
use serde::Serialize;

use super::config::Config;

/// Largest request body relayed upstream; covers profile photo uploads
pub const MAX_FORWARD_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Request headers passed through to the backend
const FORWARDED_HEADERS: [header::HeaderName; 3] =
    [header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT];

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Backend unreachable: {0}")]
    Unreachable(reqwest::Error),

    #[error("Failed to read backend response: {0}")]
    ReadBody(reqwest::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match self {
            ProxyError::InvalidUrl(_) | ProxyError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Unreachable(_) | ProxyError::ReadBody(_) => StatusCode::BAD_GATEWAY,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

pub struct ProxyState {
    client: reqwest::Client,
    backend: url::Url,
}

impl ProxyState {
    pub fn new(config: &Config) -> Result<Self, ProxyError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.backend_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build().map_err(ProxyError::Client)?,
            backend: url::Url::parse(&config.backend_url)?,
        })
    }
}

/// Router answering `/api/*` by forwarding to the backend
pub fn proxy_router(config: &Config) -> Result<Router, ProxyError> {
    let state = Arc::new(ProxyState::new(config)?);

    Ok(Router::new()
        .route("/api/{*path}", any(forward))
        .layer(DefaultBodyLimit::max(MAX_FORWARD_BODY_BYTES))
        .with_state(state))
}

/// Backend URL for an incoming `/api/...` request; path and query are kept
/// exactly as received
pub fn upstream_url(backend: &url::Url, uri: &Uri) -> Result<url::Url, ProxyError> {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let base = backend.as_str().trim_end_matches('/');
    Ok(url::Url::parse(&format!("{}{}", base, path_and_query))?)
}

async fn forward(
    State(state): State<Arc<ProxyState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let url = upstream_url(&state.backend, &uri)?;
    tracing::debug!("Forwarding {} {} -> {}", method, uri.path(), url);

    let mut request = state.client.request(method.clone(), url);
    for name in FORWARDED_HEADERS {
        if let Some(value) = headers.get(&name) {
            request = request.header(name, value.clone());
        }
    }
    if !body.is_empty() {
        request = request.body(body);
    }

    let response = request.send().await.map_err(|e| {
        tracing::error!("Failed to reach backend for {} {}: {}", method, uri.path(), e);
        ProxyError::Unreachable(e)
    })?;

    let status = response.status();
    let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
    let bytes = response.bytes().await.map_err(|e| {
        tracing::error!("Failed to read backend response for {}: {}", uri.path(), e);
        ProxyError::ReadBody(e)
    })?;

    if status.is_server_error() {
        tracing::warn!("Backend answered {} for {} {}", status, method, uri.path());
    }

    let mut reply = Response::new(Body::from(bytes));
    *reply.status_mut() = status;
    if let Some(content_type) = content_type {
        reply.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    Ok(reply)
}
