use std::sync::Arc;

use anyhow::Error;
use axum::{extract::Request, middleware::{from_fn, from_fn_with_state}, routing::get, Router};
use http::StatusCode;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::{
    config::BackendConfig,
    constants::headers::REQUEST_ID,
    middleware::{expires::layer as expires_layer, request_id::layer as request_id_layer},
    proxy::proxy_handler,
    state::AppState,
};

/// Builds the backend router with the expiry layer wrapped around it.
fn backend_router(state: Arc<AppState>) -> Router {
    let expires = from_fn_with_state(state.rules.clone(), expires_layer);

    match &state.backend {
        BackendConfig::Static { root } => {
            info!(root = %root, "Serving static files");
            Router::new()
                .fallback_service(ServeDir::new(root))
                .layer(expires)
        }
        BackendConfig::Proxy { upstream, .. } => {
            info!(upstream = %upstream, "Proxying to upstream");
            Router::new()
                .fallback(proxy_handler)
                .layer(expires)
                .with_state(state.clone())
        }
    }
}

pub fn create_app(state: Arc<AppState>) -> Result<Router, Error> {
    let router = Router::new()
        .route("/health", get(|| async { (StatusCode::OK, "OK") }))
        .fallback_service(backend_router(state));

    Ok(router
        .layer(
        TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            let request_id = request
                    .headers()
                    .get(REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

            tracing::info_span!(
                    "request",
                    id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
            )
        })
        )
        .layer(from_fn(request_id_layer))
    )
}
