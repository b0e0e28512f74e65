// # DNS Provider Trait
//
// Defines the interface for pointing DNS records at a new IP.
//
// ## Implementations
//
// - Tencent Cloud CNS: `cnsddns-provider-tencent` crate

use async_trait::async_trait;

/// What a [`DnsProvider::update_dns`] call did to the live records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsUpdate {
    /// Every configured subdomain with an "A" record now points at the IP
    Applied,

    /// Records were inspected but left untouched (dry-run)
    ///
    /// The live records still hold the old IP, so the poller must neither
    /// notify nor persist the new one.
    DryRun,
}

/// Trait for DNS provider implementations
///
/// A provider owns the set of subdomains it reconciles. The poller calls
/// [`DnsProvider::update_dns`] once per detected change and treats any error
/// as a failed tick.
///
/// # Failure Semantics
///
/// Subdomains are updated strictly in order. The first failure aborts the
/// remaining subdomains and is returned as-is; the poller will call
/// `update_dns` again with the same IP on its next tick, so every step must
/// be safe to repeat.
///
/// Providers must not retry, sleep, or touch the state store. Retry
/// cadence belongs to the poller.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Point every configured subdomain's "A" record at `ip`
    ///
    /// A subdomain without any "A" record is skipped without error.
    ///
    /// # Returns
    ///
    /// - `Ok(DnsUpdate::Applied)`: Records were rewritten
    /// - `Ok(DnsUpdate::DryRun)`: Nothing was modified
    /// - `Err(Error)`: The first failing subdomain's error
    async fn update_dns(&self, ip: &str) -> Result<DnsUpdate, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
