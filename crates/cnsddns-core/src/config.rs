//! Configuration types for cnsddns
//!
//! The whole configuration is read once at process start, validated, and
//! then handed to each component's constructor. Nothing reads it from a
//! global afterwards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the persisted IP, relative to the user's home directory
pub const STATE_FILE_NAME: &str = ".current-ip";

/// Main cnsddns configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// IP discovery configuration
    #[serde(default)]
    pub ip_source: IpSourceConfig,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Push notification configuration
    pub notifier: NotifierConfig,

    /// State store configuration
    #[serde(default)]
    pub state_store: StateStoreConfig,

    /// Poll loop settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl DdnsConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.ip_source.validate()?;
        self.provider.validate()?;
        self.notifier.validate()?;
        self.state_store.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}

/// Where the current public IP is discovered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpSourceConfig {
    /// Plain-text "what is my IP" endpoint
    #[serde(default = "default_ip_source_url")]
    pub url: String,
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.url.is_empty() {
            return Err(crate::Error::config("IP source URL cannot be empty"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(crate::Error::config(format!(
                "IP source URL must use HTTP or HTTPS scheme. Got: {}",
                self.url
            )));
        }
        Ok(())
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        Self {
            url: default_ip_source_url(),
        }
    }
}

/// Tencent Cloud CNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Zone managed at the provider (e.g. "example.com")
    pub domain: String,

    /// API caller identity, sent as `SecretId`
    pub secret_id: String,

    /// API signing key, never sent or logged
    pub secret_key: String,

    /// Signing algorithm tag ("HmacSHA1" or "HmacSHA256")
    #[serde(default = "default_signature_method")]
    pub signature_method: String,

    /// Subdomain labels to reconcile, in order
    #[serde(default = "default_subdomains")]
    pub subdomains: Vec<String>,

    /// Resolution line selector sent with every modify
    #[serde(default = "default_record_line")]
    pub record_line: String,

    /// TTL in seconds sent with every modify
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// List records and log the intended modify, but never send it
    #[serde(default)]
    pub dry_run: bool,
}

impl ProviderConfig {
    /// Create a provider configuration with default subdomains and record settings
    pub fn new(
        domain: impl Into<String>,
        secret_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            signature_method: default_signature_method(),
            subdomains: default_subdomains(),
            record_line: default_record_line(),
            ttl: default_ttl(),
            dry_run: false,
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domain.is_empty() {
            return Err(crate::Error::config("DNS domain cannot be empty"));
        }
        if self.secret_id.is_empty() {
            return Err(crate::Error::config("API secret id cannot be empty"));
        }
        if self.secret_key.is_empty() {
            return Err(crate::Error::config("API secret key cannot be empty"));
        }
        if self.subdomains.is_empty() {
            return Err(crate::Error::config("At least one subdomain must be configured"));
        }
        if let Some(empty) = self.subdomains.iter().position(|s| s.trim().is_empty()) {
            return Err(crate::Error::config(format!(
                "Subdomain #{} is empty (use \"@\" for the zone apex)",
                empty + 1
            )));
        }
        if self.ttl == 0 {
            return Err(crate::Error::config("Record TTL must be > 0"));
        }
        Ok(())
    }
}

// Keeps secret_key out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("domain", &self.domain)
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<REDACTED>")
            .field("signature_method", &self.signature_method)
            .field("subdomains", &self.subdomains)
            .field("record_line", &self.record_line)
            .field("ttl", &self.ttl)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Bark push notification configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Bark device code, part of the push URL path
    pub device_code: String,

    /// Bark server host
    #[serde(default = "default_notifier_host")]
    pub host: String,

    /// Notification tone
    #[serde(default = "default_sound")]
    pub sound: String,
}

impl NotifierConfig {
    /// Create a notifier configuration for the public Bark server
    pub fn new(device_code: impl Into<String>) -> Self {
        Self {
            device_code: device_code.into(),
            host: default_notifier_host(),
            sound: default_sound(),
        }
    }

    /// Validate the notifier configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.device_code.is_empty() {
            return Err(crate::Error::config("Notification device code cannot be empty"));
        }
        if self.host.is_empty() || self.host.contains('/') {
            return Err(crate::Error::config(format!(
                "Notification host must be a bare host name. Got: '{}'",
                self.host
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("device_code", &"<REDACTED>")
            .field("host", &self.host)
            .field("sound", &self.sound)
            .finish()
    }
}

/// State store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateStoreConfig {
    /// Plain-text file holding the last reconciled IP
    File {
        /// Path to the state file
        path: PathBuf,
    },

    /// In-memory state store (not persistent)
    Memory,
}

impl StateStoreConfig {
    /// Validate the state store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StateStoreConfig::File { path } if path.as_os_str().is_empty() => {
                Err(crate::Error::config("State file path cannot be empty"))
            }
            _ => Ok(()),
        }
    }
}

impl Default for StateStoreConfig {
    fn default() -> Self {
        StateStoreConfig::File {
            path: default_state_path(),
        }
    }
}

/// Poll loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Delay between the end of one tick and the start of the next (in seconds)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Upper bound for the delay after consecutive failed ticks (in seconds)
    ///
    /// `None` keeps the fixed interval regardless of failures. When set, each
    /// consecutive failure doubles the delay until this cap is reached; the
    /// first successful tick resets it.
    #[serde(default)]
    pub max_backoff_secs: Option<u64>,

    /// Per-request timeout for every outbound HTTP call (in seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_secs == 0 {
            return Err(crate::Error::config("Poll interval must be > 0"));
        }
        if self.http_timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeout must be > 0"));
        }
        if let Some(cap) = self.max_backoff_secs
            && cap < self.interval_secs
        {
            return Err(crate::Error::config(format!(
                "Maximum backoff ({}s) cannot be shorter than the poll interval ({}s)",
                cap, self.interval_secs
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_backoff_secs: None,
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Default location of the state file: `$HOME/.current-ip`
///
/// Falls back to the working directory when no home directory is known.
pub fn default_state_path() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(STATE_FILE_NAME)
}

fn default_ip_source_url() -> String {
    "http://ip.cip.cc".to_string()
}

fn default_signature_method() -> String {
    "HmacSHA1".to_string()
}

fn default_subdomains() -> Vec<String> {
    vec!["@".to_string(), "www".to_string()]
}

// The provider's name for its default resolution line.
fn default_record_line() -> String {
    "默认".to_string()
}

fn default_ttl() -> u32 {
    600
}

fn default_notifier_host() -> String {
    "api.day.app".to_string()
}

fn default_sound() -> String {
    "birdsong".to_string()
}

fn default_interval_secs() -> u64 {
    600
}

fn default_http_timeout_secs() -> u64 {
    30
}
