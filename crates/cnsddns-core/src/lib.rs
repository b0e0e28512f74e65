// # cnsddns-core
//
// Core library for the cnsddns dynamic DNS updater.
//
// ## Architecture Overview
//
// One poll tick walks a fixed pipeline:
//
// - **IpSource**: discovers the caller's current public IP
// - **StateStore**: holds the last IP that was reconciled with DNS
// - **DnsProvider**: rewrites the "A" records of the configured subdomains
// - **Notifier**: best-effort push notification after a DNS change
// - **Poller**: drives the pipeline forever, one tick at a time
//
// ## Consistency Rule
//
// The persisted IP is written last, after every remote effect of a tick has
// succeeded. A failed tick leaves the old IP on disk, so the next tick sees
// the same difference and retries it.

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod state;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, DnsUpdate, Notifier, StateStore};
pub use engine::{Poller, TickOutcome};
pub use config::{
    DdnsConfig, EngineConfig, IpSourceConfig, NotifierConfig, ProviderConfig, StateStoreConfig,
};
pub use error::{Error, Result};
pub use state::{MemoryStateStore, FileStateStore};
