// # IP Source Trait
//
// Defines the interface for discovering the caller's current public IP.
//
// ## Implementations
//
// - HTTP "echo my IP" endpoint: `cnsddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use cnsddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//     let ip = source.current().await?;
//     println!("current IP: {ip}");
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// The address is textual and only trimmed, never parsed: whatever the
/// upstream echoes back (minus surrounding whitespace) is the IP that gets
/// compared, persisted and written to DNS. An unreachable upstream or an
/// unusable response must be reported as [`crate::Error::IpFetch`] rather
/// than as an address.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the current IP address
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The current IP, trimmed of surrounding whitespace
    /// - `Err(Error::IpFetch)`: If the IP could not be determined
    async fn current(&self) -> Result<String, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str {
        "ip-source"
    }
}
