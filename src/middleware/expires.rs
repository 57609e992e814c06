//! Sets `Expires` on responses to requests matched by the rule set.

use std::sync::Arc;

use axum::{extract::{Request, State}, middleware::Next, response::Response};
use chrono::Utc;
use http::{header::EXPIRES, HeaderValue};
use tracing::{debug, warn};

use crate::{
    features::expires::RuleSet,
    utils::http_date::{expires_at, format_http_date},
};

/// Resolves the request against `rules` before handing it on, then annotates
/// the inner handler's response. Never rejects or short-circuits a request.
///
/// An `Expires` header already written by the inner handler is left alone.
pub async fn layer(
    State(rules): State<Arc<RuleSet>>,
    req: Request,
    next: Next,
) -> Response {
    let expires = expires_header(&rules, &req);

    let mut response = next.run(req).await;

    if let Some(value) = expires {
        response.headers_mut().entry(EXPIRES).or_insert(value);
    }
    response
}

fn expires_header(rules: &RuleSet, req: &Request) -> Option<HeaderValue> {
    let path = req.uri().path();
    let rule = rules.find(path, req.headers())?;
    let span = rule.span();

    debug!(path = %path, kind = rule.kind(), pattern = rule.pattern(), span = %span, "Expiry rule matched");

    let Some(at) = expires_at(Utc::now(), span) else {
        warn!(path = %path, span = %span, "Expiry span overflows the clock, skipping Expires");
        return None;
    };

    HeaderValue::from_str(&format_http_date(at)).ok()
}
