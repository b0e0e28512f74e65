// # Notifier Trait
//
// Push notification sent after DNS has been pointed at a new IP.

use async_trait::async_trait;

/// Trait for notification implementations
///
/// Notification is part of a tick's reconciliation: if it fails, the state
/// file is not updated and the whole change (DNS included) is replayed on
/// the next tick. Implementations should therefore only fail on transport
/// errors and ignore whatever the endpoint answers.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce that the public IP changed to `ip`
    async fn notify(&self, ip: &str) -> Result<(), crate::Error>;

    /// Get the notifier name (for logging/debugging)
    fn notifier_name(&self) -> &'static str;
}
