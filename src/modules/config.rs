use std::env;

use crate::proxy::error::ProxyError;

const UPSTREAM_URL_VAR: &str = "BFF_UPSTREAM_URL";
const BIND_VAR: &str = "BFF_BIND";
const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Process-wide upstream address, resolved once at startup.
///
/// A missing or malformed URL is a configuration error that prevents the
/// process from serving any route; it is never surfaced per-request.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    api_url: String,
}

impl UpstreamConfig {
    /// Validate and normalize a base URL (trailing slash stripped so route
    /// paths can always start with `/`).
    pub fn new(raw: &str) -> Result<Self, ProxyError> {
        let url = reqwest::Url::parse(raw)
            .map_err(|e| ProxyError::Config(format!("invalid upstream URL {raw:?}: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ProxyError::Config(format!(
                "upstream URL must be http(s), got {:?}",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(ProxyError::Config(format!(
                "upstream URL {raw:?} has no host"
            )));
        }
        Ok(Self {
            api_url: raw.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve the upstream base URL from the environment.
    pub fn from_env() -> Result<Self, ProxyError> {
        let raw = env::var(UPSTREAM_URL_VAR)
            .map_err(|_| ProxyError::Config(format!("{UPSTREAM_URL_VAR} is not set")))?;
        Self::new(&raw)
    }

    /// The validated upstream base URL, without a trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// Listen address for the inbound server.
pub fn bind_address() -> String {
    env::var(BIND_VAR).unwrap_or_else(|_| DEFAULT_BIND.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slash() {
        let cfg = UpstreamConfig::new("http://localhost:9000/").unwrap();
        assert_eq!(cfg.api_url(), "http://localhost:9000");
    }

    #[test]
    fn keeps_url_without_trailing_slash() {
        let cfg = UpstreamConfig::new("https://api.internal:8443").unwrap();
        assert_eq!(cfg.api_url(), "https://api.internal:8443");
    }

    #[test]
    fn rejects_garbage() {
        assert!(UpstreamConfig::new("not a url").is_err());
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(UpstreamConfig::new("ftp://files.internal").is_err());
    }
}
