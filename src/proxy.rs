//! Proxy module for forwarding requests to the configured upstream.

use axum::{body::Body, extract::State, http::HeaderMap, response::Response, Extension};
use bytes::Bytes;
use http::{HeaderValue, Method, Uri};
use http_body_util::BodyExt;
use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;

use crate::{config::BackendConfig, constants::headers::REQUEST_ID, errors::AppError, state::AppState};

/// Request headers that are propagated upstream.
const FORWARDED_HEADERS: [&str; 7] = [
    "content-type",
    "content-length",
    "accept",
    "accept-encoding",
    "user-agent",
    "cache-control",
    REQUEST_ID,
];

/// Response headers owned by this hop and never copied back.
const HOP_BY_HOP: [&str; 3] = ["connection", "transfer-encoding", "keep-alive"];

fn filter_forwarded_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::new();

    for (name, value) in headers {
        if FORWARDED_HEADERS.contains(&name.as_str()) {
            forwarded.append(name, value.clone());
        }
    }

    forwarded
}

/// Joins the upstream base with the request path and query.
pub fn destination_url(upstream: &str, uri: &Uri) -> Result<Url, AppError> {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let raw = format!("{}{}", upstream.trim_end_matches('/'), path_and_query);

    let url = Url::parse(&raw)
        .map_err(|_| AppError::InvalidDestination(format!("Invalid URL format: {}", raw)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::InvalidDestination(format!(
            "Only HTTP and HTTPS protocols allowed, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

pub async fn proxy_handler(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<Arc<String>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, AppError> {
    let BackendConfig::Proxy { upstream, max_body_size } = &state.backend else {
        error!("Proxy handler mounted without a proxy backend");
        return Err(AppError::InternalServerError);
    };

    let destination = destination_url(upstream, &uri)?;
    info!(destination = %destination, "Forwarding request to upstream");

    let body_bytes: Bytes = body
        .collect()
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to read request body");
            AppError::InternalServerError
        })?
        .to_bytes();

    if body_bytes.len() > *max_body_size {
        warn!(size = body_bytes.len(), limit = *max_body_size, "Request body exceeds limit");
        return Err(AppError::RequestTooLarge);
    }

    let mut forwarded = filter_forwarded_headers(&headers);
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        forwarded.insert(REQUEST_ID, value);
    }

    let request = state
        .http_client
        .request(method, destination.clone())
        .headers(forwarded)
        .body(body_bytes)
        .build()
        .map_err(|e| {
            error!(error = %e, "Failed to build upstream request");
            AppError::InvalidDestination(destination.to_string())
        })?;

    let upstream_response = state.http_client.execute(request).await?;

    let status = upstream_response.status();
    let upstream_headers = upstream_response.headers().clone();
    let bytes = upstream_response.bytes().await?;

    let mut response = Response::builder()
        .status(status)
        .body(Body::from(bytes))
        .map_err(|_| AppError::InternalServerError)?;

    for (name, value) in upstream_headers.iter() {
        if !HOP_BY_HOP.contains(&name.as_str()) {
            response.headers_mut().append(name, value.clone());
        }
    }

    Ok(response)
}
