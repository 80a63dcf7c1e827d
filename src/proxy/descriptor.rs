//! Route forwarding descriptors.
//!
//! Each inbound route is described by one immutable [`RouteForward`] value
//! built at registration time; the handler factory turns it into an axum
//! handler. Forwarding behavior lives in data, not in per-route code.

use axum::extract::RawPathParams;
use axum::http::Method;
use bytes::Bytes;

use crate::proxy::error::ProxyError;

/// How the upstream response is materialized for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Buffered body, content type from upstream with `application/json`
    /// fallback. Bytes are relayed untouched, never re-serialized.
    Json,
    /// Buffered body, content type copied verbatim (no fallback). For
    /// binary/opaque payloads not guaranteed to be JSON.
    Passthrough,
    /// Body relayed chunk-by-chunk without buffering the whole payload.
    /// Required for large downloads.
    Stream,
}

/// Builds the upstream path from the captured path parameters.
pub type PathBuilder = fn(&PathParams<'_>) -> Result<String, ProxyError>;

/// Pre-forward precondition on the buffered request body.
pub type BodyValidator = fn(&Bytes) -> Result<(), ProxyError>;

/// Declarative configuration for one forwarded route.
///
/// Descriptors are `'static`, constructed once, and shared by every request
/// to the route; they hold no per-request state.
pub struct RouteForward {
    pub method: Method,
    pub path: PathBuilder,
    pub forward_query: bool,
    pub forward_body: bool,
    pub mode: ResponseMode,
    pub validate: Option<BodyValidator>,
    pub require_auth: bool,
}

impl RouteForward {
    pub const fn new(method: Method, path: PathBuilder) -> Self {
        Self {
            method,
            path,
            forward_query: false,
            forward_body: false,
            mode: ResponseMode::Json,
            validate: None,
            require_auth: false,
        }
    }

    pub const fn get(path: PathBuilder) -> Self {
        Self::new(Method::GET, path)
    }

    /// Forward the inbound raw query string verbatim.
    pub const fn query(mut self) -> Self {
        self.forward_query = true;
        self
    }

    /// Read the inbound body once and forward it unmodified.
    pub const fn body(mut self) -> Self {
        self.forward_body = true;
        self
    }

    pub const fn mode(mut self, mode: ResponseMode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn validate(mut self, validator: BodyValidator) -> Self {
        self.validate = Some(validator);
        self
    }

    /// Reject requests without an attached caller context.
    pub const fn authenticated(mut self) -> Self {
        self.require_auth = true;
        self
    }
}

/// Captured path parameters, exposed to path builders.
///
/// Parameter values are always percent-encoded before substitution, so a
/// value like `abc/def` lands in the upstream path as a single `abc%2Fdef`
/// segment instead of altering the route structure.
pub struct PathParams<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> PathParams<'a> {
    pub fn new(pairs: Vec<(&'a str, &'a str)>) -> Self {
        Self { pairs }
    }

    pub fn from_raw(raw: &'a RawPathParams) -> Self {
        Self {
            pairs: raw.iter().collect(),
        }
    }

    /// The named parameter as a percent-encoded path segment.
    pub fn seg(&self, name: &'static str) -> Result<String, ProxyError> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| urlencoding::encode(value).into_owned())
            .ok_or(ProxyError::MissingParam(name))
    }

    /// The named parameter verbatim, for callers that craft a full
    /// pre-encoded segment themselves. Use `seg` unless the route explicitly
    /// owns the encoding.
    pub fn raw(&self, name: &'static str) -> Result<&'a str, ProxyError> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or(ProxyError::MissingParam(name))
    }
}
