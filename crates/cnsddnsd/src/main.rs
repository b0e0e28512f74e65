// # cnsddnsd - CNS Dynamic DNS Daemon
//
// Thin integration layer: parse flags, set up logging and the runtime, wire
// the components, and hand control to the Poller. All reconciliation logic
// lives in cnsddns-core and the component crates.
//
// ## Configuration
//
// Flags (each also readable from the environment):
//
// - `--bark` / `CNSDDNS_BARK`: Bark device code (required)
// - `--domain` / `CNSDDNS_DOMAIN`: Zone at CNS (required)
// - `--secretId` / `CNSDDNS_SECRET_ID`: API SecretId (required)
// - `--secretKey` / `CNSDDNS_SECRET_KEY`: API SecretKey (required)
// - `--period` / `CNSDDNS_PERIOD`: Poll interval in seconds (600)
// - `--subdomain` / `CNSDDNS_SUBDOMAINS`: Subdomains to reconcile (@, www)
// - `--log-level` / `CNSDDNS_LOG_LEVEL`: trace, debug, info, warn, error
//
// See `cnsddnsd --help` for the rest.
//
// ## Example
//
// ```bash
// export CNSDDNS_SECRET_KEY=...
// cnsddnsd --bark DEVICE --domain example.com --secretId AKID...
// ```

mod cli;

use anyhow::Result;
use clap::Parser;
use cnsddns_core::config::{DdnsConfig, StateStoreConfig};
use cnsddns_core::traits::StateStore;
use cnsddns_core::{FileStateStore, MemoryStateStore, Poller};
use cnsddns_ip_http::HttpIpSource;
use cnsddns_notify_bark::BarkNotifier;
use cnsddns_provider_tencent::{SignatureAlgorithm, TencentCnsProvider};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
///
/// Usage errors from flag parsing exit with clap's own code (2).
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Prints usage and exits on missing/invalid flags
    let cli = Cli::parse();
    let log_level = parse_log_level(&cli.log_level);
    let config = cli.into_config();

    if let Err(e) = validate(&config) {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting cnsddnsd");
    info!("Configuration loaded: {:?}", config);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        let poller = match build_poller(&config).await {
            Ok(poller) => poller,
            Err(e) => {
                error!("Startup error: {}", e);
                return DdnsExitCode::ConfigError;
            }
        };

        match poller.run().await {
            Ok(()) => DdnsExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {}", e);
                DdnsExitCode::RuntimeError
            }
        }
    });

    info!("cnsddnsd stopped");
    code.into()
}

/// Map a validated `--log-level` value to a tracing level
fn parse_log_level(level: &str) -> Level {
    match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Everything that must hold before any network call is made
fn validate(config: &DdnsConfig) -> Result<()> {
    config.validate()?;
    config
        .provider
        .signature_method
        .parse::<SignatureAlgorithm>()?;
    Ok(())
}

/// Construct every component from the configuration
async fn build_poller(config: &DdnsConfig) -> Result<Poller> {
    let timeout = Duration::from_secs(config.engine.http_timeout_secs);

    let ip_source = HttpIpSource::from_config(&config.ip_source, timeout)?;
    let provider = TencentCnsProvider::from_config(&config.provider, timeout)?;
    let notifier = BarkNotifier::from_config(&config.notifier, timeout)?;

    let state_store: Box<dyn StateStore> = match &config.state_store {
        StateStoreConfig::File { path } => {
            info!("Persisting last IP to {}", path.display());
            Box::new(FileStateStore::new(path).await?)
        }
        StateStoreConfig::Memory => {
            info!("Keeping last IP in memory only");
            Box::new(MemoryStateStore::new())
        }
    };

    if config.provider.dry_run {
        info!("Dry-run mode: DNS records will not be modified");
    }

    let poller = Poller::new(
        Box::new(ip_source),
        Box::new(provider),
        Box::new(notifier),
        state_store,
        &config.engine,
    )?;

    Ok(poller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnsddns_core::config::{NotifierConfig, ProviderConfig};

    fn config() -> DdnsConfig {
        DdnsConfig {
            ip_source: Default::default(),
            provider: ProviderConfig::new("example.com", "AKID", "SECRET"),
            notifier: NotifierConfig::new("DEVICE"),
            state_store: StateStoreConfig::Memory,
            engine: Default::default(),
        }
    }

    #[test]
    fn unsupported_signature_method_fails_at_startup() {
        let mut config = config();
        config.provider.signature_method = "HmacMD5".to_string();

        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("HmacMD5"));
    }

    #[test]
    fn valid_config_passes_startup_checks() {
        assert!(validate(&config()).is_ok());
    }

    #[test]
    fn log_levels_map_to_tracing() {
        assert_eq!(parse_log_level("debug"), Level::DEBUG);
        assert_eq!(parse_log_level("error"), Level::ERROR);
        assert_eq!(parse_log_level("info"), Level::INFO);
    }

    #[tokio::test]
    async fn components_wire_up_without_network() {
        assert!(build_poller(&config()).await.is_ok());
    }

    #[tokio::test]
    async fn file_store_parent_is_created_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join(".current-ip");

        let mut config = config();
        config.state_store = StateStoreConfig::File { path: path.clone() };

        assert!(build_poller(&config).await.is_ok());
        assert!(path.parent().is_some_and(|p| p.is_dir()));
    }
}
