//! Proxy handler factory.
//!
//! Turns a [`RouteForward`] descriptor into an axum handler implementing the
//! full forward/relay contract: build upstream path and query, attach auth
//! headers, forward the body when the route asks for it, make exactly one
//! upstream call, and hand the response to the relay.

use axum::{
    extract::{RawPathParams, RawQuery, Request, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::{on, MethodFilter, MethodRouter},
};
use tracing::debug;

use crate::proxy::auth::{build_auth_headers, require_caller, CallerContext};
use crate::proxy::descriptor::{PathParams, RouteForward};
use crate::proxy::error::ProxyError;
use crate::proxy::relay;
use crate::proxy::server::AppState;

/// Build the axum handler for one route descriptor.
///
/// Called once per route at registration time; panics there (and only there)
/// if the descriptor carries a method axum cannot register, which is a
/// programming error on the route table, not a runtime condition.
pub fn forward(route: &'static RouteForward) -> MethodRouter<AppState> {
    let filter = MethodFilter::try_from(route.method.clone())
        .expect("route descriptor uses an unroutable HTTP method");

    on(
        filter,
        move |State(state): State<AppState>,
              raw_params: RawPathParams,
              RawQuery(query): RawQuery,
              request: Request| async move {
            match forward_request(route, &state, &raw_params, query, request).await {
                Ok(response) => response,
                Err(e) => e.into_response(),
            }
        },
    )
}

async fn forward_request(
    route: &'static RouteForward,
    state: &AppState,
    raw_params: &RawPathParams,
    query: Option<String>,
    request: Request,
) -> Result<Response, ProxyError> {
    let caller = request.extensions().get::<CallerContext>().cloned();
    if route.require_auth {
        require_caller(caller.as_ref())?;
    }

    // Path parameters only ever enter the URL through the descriptor's path
    // builder, which receives them pre-encoded.
    let params = PathParams::from_raw(raw_params);
    let path = (route.path)(&params)?;

    let mut url = format!("{}{}", state.config.api_url(), path);
    if route.forward_query {
        // Raw query string, byte-for-byte; values are never reparsed or
        // re-encoded on the way through.
        if let Some(q) = query {
            url.push('?');
            url.push_str(&q);
        }
    }

    let inbound_content_type = request.headers().get(header::CONTENT_TYPE).cloned();

    // The inbound body is read exactly once, and only for routes that
    // forward it; otherwise it is left unconsumed.
    let body = if route.forward_body {
        let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .map_err(|e| ProxyError::Validation(format!("failed to read request body: {e}")))?;
        if let Some(validate) = route.validate {
            validate(&bytes)?;
        }
        Some(bytes)
    } else {
        None
    };

    let mut extra = HeaderMap::new();
    if body.is_some() {
        let content_type = inbound_content_type
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));
        extra.insert(header::CONTENT_TYPE, content_type);
    }
    let headers = build_auth_headers(caller.as_ref(), &extra);

    debug!("forwarding {} {}", route.method, url);
    let upstream = state
        .upstream
        .send(route.method.clone(), &url, headers, body)
        .await?;

    if upstream.status().is_success() {
        let response = relay::relay(upstream, route.mode).await?;
        return Ok(response.into_response());
    }
    let response = relay::propagate(upstream).await?;
    Ok(response.into_response())
}
