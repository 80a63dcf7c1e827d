use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;

/// Uniform client-facing error body: `{"error": "..."}`.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Failure classes of the forwarding layer.
///
/// Upstream non-2xx responses are deliberately NOT represented here: they are
/// relayed to the client with the upstream's own status and body (see
/// `relay::propagate`), so only failures produced by this layer itself get
/// normalized into the uniform error shape.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Startup-fatal: upstream base URL missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Inbound request failed a route precondition; no upstream call is made.
    #[error("{0}")]
    Validation(String),

    /// A path parameter the route's path builder needs was not captured.
    #[error("missing path parameter `{0}`")]
    MissingParam(&'static str),

    /// The route requires a caller context and none was attached.
    #[error("authentication required")]
    AuthContextMissing,

    /// Transport-level failure talking to the upstream API.
    #[error("upstream request failed")]
    Upstream(#[source] reqwest::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Validation(_) | ProxyError::MissingParam(_) => StatusCode::BAD_REQUEST,
            ProxyError::AuthContextMissing => StatusCode::UNAUTHORIZED,
            ProxyError::Config(_) | ProxyError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        // Transport details stay in the log; the client only sees the
        // generic message carried by the Display impl.
        if let ProxyError::Upstream(e) = &self {
            error!("upstream transport failure: {e}");
        }
        let message = self.to_string();
        (self.status(), Json(ErrorBody { error: &message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            ProxyError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_param_maps_to_400() {
        assert_eq!(
            ProxyError::MissingParam("file_id").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn auth_missing_maps_to_401() {
        assert_eq!(
            ProxyError::AuthContextMissing.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ProxyError::AuthContextMissing.to_string(), "authentication required");
    }
}
