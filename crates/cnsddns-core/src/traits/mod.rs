//! Core traits for cnsddns
//!
//! This module defines the interfaces the poller drives on every tick.
//!
//! - [`IpSource`]: Discover the current public IP
//! - [`DnsProvider`]: Rewrite DNS "A" records via a provider API
//! - [`Notifier`]: Announce a completed change
//! - [`StateStore`]: Remember the last reconciled IP

pub mod ip_source;
pub mod dns_provider;
pub mod notifier;
pub mod state_store;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsUpdate};
pub use notifier::Notifier;
pub use state_store::StateStore;
