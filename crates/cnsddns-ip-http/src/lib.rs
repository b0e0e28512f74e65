// # HTTP IP Source
//
// Discovers the current public IP by fetching a plain-text "echo my IP"
// endpoint (default `http://ip.cip.cc`). The body is the IP literal; it is
// trimmed and returned as-is, without parsing.
//
// One GET per call, no caching. Timeouts come from the configured HTTP
// timeout.

use cnsddns_core::config::IpSourceConfig;
use cnsddns_core::traits::IpSource;
use cnsddns_core::{Error, Result};
use std::time::Duration;

/// HTTP-based IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: Endpoint answering with the caller's IP as plain text
    /// - `timeout`: Per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ip_fetch(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create from configuration
    pub fn from_config(config: &IpSourceConfig, timeout: Duration) -> Result<Self> {
        config.validate()?;
        Self::new(config.url.clone(), timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_fetch(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ip_fetch(format!(
                "{} answered with status {}",
                self.url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_fetch(format!("Failed to read response: {}", e)))?;

        let ip = parse_ip_body(&body)?;
        tracing::debug!("{} reported {}", self.url, ip);
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

/// Trim a response body down to the IP text
///
/// An empty or whitespace-only body is a fetch failure.
pub fn parse_ip_body(body: &str) -> Result<String> {
    let ip = body.trim();
    if ip.is_empty() {
        return Err(Error::ip_fetch("Empty response body"));
    }
    Ok(ip.to_string())
}
