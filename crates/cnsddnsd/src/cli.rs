// Command-line surface of the daemon. Every flag can also come from a
// `CNSDDNS_*` environment variable.

use clap::Parser;
use cnsddns_core::config::{
    DdnsConfig, EngineConfig, IpSourceConfig, NotifierConfig, ProviderConfig, StateStoreConfig,
    default_state_path,
};
use std::path::PathBuf;

/// Keep Tencent Cloud CNS "A" records pointed at this host's public IP
#[derive(Debug, Parser)]
#[command(name = "cnsddnsd", version, about)]
pub struct Cli {
    /// Bark device code for change notifications
    #[arg(long, env = "CNSDDNS_BARK", hide_env_values = true)]
    pub bark: String,

    /// Poll interval in seconds
    #[arg(long, env = "CNSDDNS_PERIOD", default_value_t = 600)]
    pub period: u64,

    /// Zone managed at CNS (e.g. example.com)
    #[arg(long, env = "CNSDDNS_DOMAIN")]
    pub domain: String,

    /// API SecretId
    #[arg(long = "secretId", env = "CNSDDNS_SECRET_ID")]
    pub secret_id: String,

    /// API SecretKey
    #[arg(long = "secretKey", env = "CNSDDNS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Subdomain to reconcile; repeat for several [default: @ and www]
    #[arg(long = "subdomain", env = "CNSDDNS_SUBDOMAINS", value_delimiter = ',')]
    pub subdomains: Vec<String>,

    /// Request signing algorithm (HmacSHA1 or HmacSHA256)
    #[arg(long, env = "CNSDDNS_SIGNATURE_METHOD", default_value = "HmacSHA1")]
    pub signature_method: String,

    /// Plain-text "what is my IP" endpoint
    #[arg(long, env = "CNSDDNS_IP_URL", default_value = "http://ip.cip.cc")]
    pub ip_url: String,

    /// State file [default: ~/.current-ip]
    #[arg(long, env = "CNSDDNS_STATE_FILE", conflicts_with = "memory_state")]
    pub state_file: Option<PathBuf>,

    /// Keep the last IP in memory only (first tick after a restart is a baseline)
    #[arg(long, env = "CNSDDNS_MEMORY_STATE")]
    pub memory_state: bool,

    /// Back off exponentially after failed ticks, up to this many seconds
    #[arg(long, env = "CNSDDNS_MAX_BACKOFF")]
    pub max_backoff: Option<u64>,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "CNSDDNS_HTTP_TIMEOUT", default_value_t = 30)]
    pub http_timeout: u64,

    /// List records and log intended changes without modifying DNS
    #[arg(long, env = "CNSDDNS_DRY_RUN")]
    pub dry_run: bool,

    /// Log verbosity
    #[arg(
        long,
        env = "CNSDDNS_LOG_LEVEL",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log_level: String,
}

impl Cli {
    /// Build the immutable daemon configuration
    pub fn into_config(self) -> DdnsConfig {
        let mut provider = ProviderConfig::new(self.domain, self.secret_id, self.secret_key);
        provider.signature_method = self.signature_method;
        provider.dry_run = self.dry_run;
        if !self.subdomains.is_empty() {
            provider.subdomains = self.subdomains;
        }

        let state_store = if self.memory_state {
            StateStoreConfig::Memory
        } else {
            StateStoreConfig::File {
                path: self.state_file.unwrap_or_else(default_state_path),
            }
        };

        DdnsConfig {
            ip_source: IpSourceConfig { url: self.ip_url },
            provider,
            notifier: NotifierConfig::new(self.bark),
            state_store,
            engine: EngineConfig {
                interval_secs: self.period,
                max_backoff_secs: self.max_backoff,
                http_timeout_secs: self.http_timeout,
            },
        }
    }
}
