use std::sync::Arc;

use axum::{extract::Request, middleware::Next, response::Response};
use http::HeaderValue;
use uuid::Uuid;

use crate::constants::headers::REQUEST_ID;

/// Ensures every request carries an `x-request-id`, exposes it to handlers as
/// an `Extension<Arc<String>>`, and echoes it on the response.
pub async fn layer(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header_value {
        req.headers_mut().insert(REQUEST_ID, value.clone());
    }
    req.extensions_mut().insert(Arc::new(request_id));

    let mut response = next.run(req).await;
    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID, value);
    }
    response
}
