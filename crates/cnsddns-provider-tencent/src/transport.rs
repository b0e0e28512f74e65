// # HTTP Transport
//
// Raw GET-and-read-body seam between the provider and the network. The
// provider only ever needs the response text; status handling lives here.

use async_trait::async_trait;
use cnsddns_core::{Error, Result};
use std::time::Duration;

/// Issues a GET and returns the full response body
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetch `url`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: Body of a 2xx response
    /// - `Err(Error::Http)`: Transport failure, timeout or non-2xx status
    async fn get(&self, url: &str) -> Result<String>;
}

/// reqwest-backed transport with a per-call timeout
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http(format!("Unexpected status: {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))
    }
}
