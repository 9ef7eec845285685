//! HTTP client helper with native-tls support, used for the backend health probe.

use crate::error::{BridgeError, Result};
use serde::Deserialize;
use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};
use url::Url;

/// Global timeout for all HTTP operations.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum response body size for the health endpoint (64 KiB).
pub const MAX_HEALTH_RESPONSE_SIZE: u64 = 64 * 1024;

/// Health endpoint path on the backend.
pub const HEALTH_PATH: &str = "/api/health";

/// Body returned by the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// HTTP(S) URL of the health endpoint for a real-time endpoint.
///
/// `wss` maps to `https` and `ws` to `http`; any path or query on the
/// endpoint is replaced.
pub fn health_url(endpoint: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint).map_err(|e| BridgeError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    let scheme = match url.scheme() {
        "wss" | "https" => "https",
        "ws" | "http" => "http",
        other => {
            return Err(BridgeError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("unsupported scheme '{other}'"),
            });
        }
    };
    url.set_scheme(scheme)
        .map_err(|()| BridgeError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("cannot switch scheme to '{scheme}'"),
        })?;
    url.set_path(HEALTH_PATH);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Create a new HTTP agent configured with native-tls and a global timeout.
pub fn agent() -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(HTTP_TIMEOUT))
        .build()
        .into()
}

/// Query the backend health endpoint (blocking).
///
/// # Errors
///
/// Returns an error if the endpoint is not a valid URL, the request fails
/// (DNS, connection, TLS, or non-2xx response), the body exceeds
/// [`MAX_HEALTH_RESPONSE_SIZE`], or the body is not the expected JSON.
pub fn check_health(endpoint: &str) -> Result<HealthStatus> {
    let url = health_url(endpoint)?;
    log::info!("Checking backend health at {}", url);

    let body = agent()
        .get(url.as_str())
        .header("User-Agent", "notify-bridge")
        .header("Accept", "application/json")
        .call()
        .map_err(|e| BridgeError::Http(format!("Failed to reach '{}': {}", url, e)))?
        .into_body()
        .with_config()
        .limit(MAX_HEALTH_RESPONSE_SIZE)
        .read_to_string()
        .map_err(|e| BridgeError::Http(format!("Failed to read response body: {}", e)))?;

    parse_health(&body)
}

fn parse_health(body: &str) -> Result<HealthStatus> {
    serde_json::from_str(body)
        .map_err(|e| BridgeError::Http(format!("Unexpected health response '{}': {}", body, e)))
}
