//! Auth context resolution.
//!
//! Translates the per-request caller identity (attached by the session
//! middleware) into the header set the upstream API expects. This layer never
//! issues or refreshes credentials; it only forwards what is already there.

use axum::http::{header, HeaderMap, HeaderValue};

use crate::proxy::error::ProxyError;

/// The authenticated identity attached to an inbound request.
///
/// Both fields are optional: a request without a session simply produces
/// credential-free upstream headers, and enforcement is left to the upstream
/// API unless the route itself opts into `require_auth`.
#[derive(Debug, Clone, Default)]
pub struct CallerContext {
    pub access_token: Option<String>,
    pub cookie_header: Option<String>,
}

impl CallerContext {
    /// Extract a caller context from the inbound request headers.
    ///
    /// Returns `None` when the request carries neither a bearer token nor a
    /// cookie, so downstream code can distinguish "anonymous" cheaply.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let access_token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.to_string());

        let cookie_header = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(|c| c.to_string());

        if access_token.is_none() && cookie_header.is_none() {
            return None;
        }
        Some(Self {
            access_token,
            cookie_header,
        })
    }
}

/// Build the upstream header set for a request.
///
/// Extra headers (e.g. `Content-Type`) are merged first; credential headers
/// derived from the caller context are inserted last, so an extra header can
/// never silently shadow a credential on a conflicting name.
pub fn build_auth_headers(caller: Option<&CallerContext>, extra: &HeaderMap) -> HeaderMap {
    let mut headers = extra.clone();

    if let Some(ctx) = caller {
        if let Some(token) = &ctx.access_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(header::AUTHORIZATION, value);
            }
        }
        if let Some(cookie) = &ctx.cookie_header {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                headers.insert(header::COOKIE, value);
            }
        }
    }

    headers
}

/// Route-level policy hook: reject when a route demands a caller context.
pub fn require_caller(caller: Option<&CallerContext>) -> Result<&CallerContext, ProxyError> {
    caller.ok_or(ProxyError::AuthContextMissing)
}
