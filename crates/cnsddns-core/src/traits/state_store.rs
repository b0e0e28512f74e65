// # State Store Trait
//
// Defines the interface for the single persisted value: the last IP that was
// successfully reconciled with DNS.
//
// ## Implementations
//
// - Plain-text file: [`crate::state::FileStateStore`]
// - In-memory: [`crate::state::MemoryStateStore`]
//
// ## Usage
//
// ```rust,ignore
// use cnsddns_core::StateStore;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* StateStore implementation */;
//
//     match store.load().await? {
//         None => store.save("1.2.3.4").await?,
//         Some(ip) => println!("last reconciled IP: {ip}"),
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for state store implementations
///
/// # Invariant
///
/// After every successful reconciliation the stored value equals the live
/// IP; between reconciliations it holds the previous one. The poller keeps
/// this true by calling [`StateStore::save`] only as the last step of a
/// tick. Implementations must make `save` all-or-nothing so an interrupted
/// write never leaves a partially written value behind.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the last reconciled IP
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ip))`: The stored IP
    /// - `Ok(None)`: No prior state (first run)
    /// - `Err(Error::Persistence)`: The state exists but could not be read
    async fn load(&self) -> Result<Option<String>, crate::Error>;

    /// Replace the stored IP with `ip`
    ///
    /// The exact bytes of `ip` are stored, with no framing added.
    async fn save(&self, ip: &str) -> Result<(), crate::Error>;
}
