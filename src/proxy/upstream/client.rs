// Upstream client wrapper around a pooled reqwest client.

use axum::http::{HeaderMap, Method};
use bytes::Bytes;
use reqwest::Client;
use tokio::time::Duration;

use crate::proxy::error::ProxyError;

/// Shared HTTP client for the upstream API.
///
/// Built once at startup and reused for every forwarded request. Only a
/// connect timeout is configured: a total-request deadline would cut long
/// streamed downloads short, and the forwarding layer defines no timeout
/// policy of its own.
pub struct UpstreamClient {
    http_client: Client,
}

impl UpstreamClient {
    pub fn new() -> Result<Self, ProxyError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| ProxyError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http_client })
    }

    /// Issue exactly one upstream call. No retry, no endpoint fallback:
    /// transport failures surface immediately so the handler can normalize
    /// them.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<reqwest::Response, ProxyError> {
        let mut request = self.http_client.request(method, url).headers(headers);
        if let Some(bytes) = body {
            request = request.body(bytes);
        }
        request.send().await.map_err(ProxyError::Upstream)
    }
}
