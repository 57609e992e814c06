//! Middleware module providing request processing layers.
//!
//! Available middleware:
//! - `expires` - `Expires` header annotation from the configured rule set
//! - `request_id` - Request tracing

pub mod expires;
pub mod request_id;
