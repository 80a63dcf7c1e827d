//! Response relay: materializes an upstream response for the client.

use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};
use futures_util::TryStreamExt;
use tracing::warn;

use crate::proxy::descriptor::ResponseMode;
use crate::proxy::error::ProxyError;

/// Relay a successful (2xx) upstream response per the route's response mode.
///
/// All modes preserve the upstream status code. `Json` and `Passthrough`
/// buffer the body and pass the bytes through untouched; `Stream` relays
/// chunk-by-chunk so memory stays constant regardless of payload size.
pub async fn relay(
    upstream: reqwest::Response,
    mode: ResponseMode,
) -> Result<Response<Body>, ProxyError> {
    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();

    match mode {
        ResponseMode::Json => {
            let bytes = upstream.bytes().await.map_err(ProxyError::Upstream)?;
            let content_type = content_type
                .unwrap_or_else(|| HeaderValue::from_static("application/json"));
            Ok(build(status, Some(content_type), Body::from(bytes)))
        }
        ResponseMode::Passthrough => {
            let bytes = upstream.bytes().await.map_err(ProxyError::Upstream)?;
            Ok(build(status, content_type, Body::from(bytes)))
        }
        ResponseMode::Stream => {
            // A failure after the first chunk cannot become a clean JSON
            // error anymore; the stream ends abruptly and the client must
            // treat truncation as failure.
            let stream = upstream
                .bytes_stream()
                .inspect_err(|e| warn!("stream relay aborted mid-body: {e}"));
            Ok(build(status, content_type, Body::from_stream(stream)))
        }
    }
}

/// Relay a non-2xx upstream response verbatim: original status, content type
/// and body. The forwarding layer does not re-interpret upstream failures.
pub async fn propagate(upstream: reqwest::Response) -> Result<Response<Body>, ProxyError> {
    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let bytes = upstream.bytes().await.map_err(ProxyError::Upstream)?;
    Ok(build(status, content_type, Body::from(bytes)))
}

fn build(status: StatusCode, content_type: Option<HeaderValue>, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    if let Some(value) = content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}
