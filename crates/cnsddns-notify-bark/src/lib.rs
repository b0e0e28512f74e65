// # Bark Notifier
//
// Best-effort push notification through a Bark server after a DNS change.
//
// ```http
// GET https://api.day.app/<device-code>/ip-change/<ip>?isArchive=1&sound=birdsong
// Content-Type: application/x-www-form-urlencoded
// ```
//
// The response body is ignored and any HTTP status counts as delivered.
// Only transport failures are errors.

use cnsddns_core::config::NotifierConfig;
use cnsddns_core::traits::Notifier;
use cnsddns_core::{Error, Result};
use std::time::Duration;

/// Notification title segment of the push URL
const TITLE: &str = "ip-change";

/// Bark push notifier
///
/// The device code acts as a bearer secret, so Debug hides it.
#[derive(Clone)]
pub struct BarkNotifier {
    device_code: String,
    host: String,
    sound: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for BarkNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarkNotifier")
            .field("device_code", &"<REDACTED>")
            .field("host", &self.host)
            .field("sound", &self.sound)
            .finish()
    }
}

impl BarkNotifier {
    /// Create a notifier
    ///
    /// # Parameters
    ///
    /// - `config`: Device code, server host and tone
    /// - `timeout`: Per-request timeout
    pub fn from_config(config: &NotifierConfig, timeout: Duration) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::notification(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            device_code: config.device_code.clone(),
            host: config.host.clone(),
            sound: config.sound.clone(),
            client,
        })
    }

    /// Push URL announcing `ip`
    pub fn notification_url(&self, ip: &str) -> String {
        format!(
            "https://{}/{}/{}/{}?isArchive=1&sound={}",
            self.host, self.device_code, TITLE, ip, self.sound
        )
    }
}

#[async_trait::async_trait]
impl Notifier for BarkNotifier {
    async fn notify(&self, ip: &str) -> Result<()> {
        let response = self
            .client
            .get(self.notification_url(ip))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .send()
            .await
            // Strip the URL: it carries the device code
            .map_err(|e| {
                Error::notification(format!(
                    "Request to {} failed: {}",
                    self.host,
                    e.without_url()
                ))
            })?;

        tracing::debug!("Bark answered {}", response.status());
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "bark"
    }
}
