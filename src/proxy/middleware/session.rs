//! Session extraction shim.
//!
//! Stands in for the session/identity infrastructure that owns credential
//! issuance: it lifts whatever identity material the inbound request already
//! carries into a [`CallerContext`] request extension. The forwarding core
//! only ever consumes that extension.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::proxy::auth::CallerContext;

pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    if let Some(ctx) = CallerContext::from_headers(request.headers()) {
        request.extensions_mut().insert(ctx);
    }
    next.run(request).await
}
