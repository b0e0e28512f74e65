// # Tencent Cloud CNS Provider
//
// DNS provider for the Tencent Cloud CNS v2 API (`cns.api.qcloud.com`).
//
// ## Behavior
//
// For each configured subdomain, in order:
//
// 1. `RecordList` for `(domain, subDomain)`
// 2. Pick the first record of type "A" in provider order
// 3. `RecordModify` that record to the new IP, with the configured line
//    selector and TTL
//
// A subdomain without an "A" record is skipped silently. The first failing
// subdomain aborts the remaining ones for this update.
//
// ## Security Requirements
//
// - The secret key never appears in logs or URLs; only the signature does
// - Every request carries a fresh `Timestamp` and `Nonce`
//
// ## API Reference
//
// - Endpoint: `GET https://cns.api.qcloud.com/v2/index.php?<signed query>`
// - Envelope: `{"code": 0, "message": "...", "codeDesc": "...", "data": {...}}`
// - RecordList: `data.records[]` with `id`, `name`, `type`, `value`

pub mod signer;
pub mod transport;

use async_trait::async_trait;
use cnsddns_core::config::ProviderConfig;
use cnsddns_core::traits::{DnsProvider, DnsUpdate};
use cnsddns_core::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

pub use signer::{Credentials, RequestSigner, SignatureAlgorithm};
pub use transport::{HttpTransport, ReqwestTransport};

/// CNS v2 API endpoint
pub const API_URL: &str = "https://cns.api.qcloud.com/v2/index.php";

/// HTTP method used for every call
const API_METHOD: &str = "GET";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A DNS record as returned by `RecordList`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Provider-assigned record id
    pub id: u64,
    /// Subdomain label
    pub name: String,
    /// Record type ("A", "CNAME", ...)
    pub record_type: String,
    /// Record value
    pub value: String,
}

/// Tencent Cloud CNS DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is set, records are still listed but the intended
/// `RecordModify` is only logged.
pub struct TencentCnsProvider {
    signer: RequestSigner,
    domain: String,
    signature_method: String,
    subdomains: Vec<String>,
    record_line: String,
    ttl: u32,
    dry_run: bool,
    transport: Box<dyn HttpTransport>,
}

// Credentials already redact themselves; the transport has nothing to show.
impl std::fmt::Debug for TencentCnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TencentCnsProvider")
            .field("signer", &self.signer)
            .field("domain", &self.domain)
            .field("signature_method", &self.signature_method)
            .field("subdomains", &self.subdomains)
            .field("record_line", &self.record_line)
            .field("ttl", &self.ttl)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl TencentCnsProvider {
    /// Create a provider talking to the live API
    ///
    /// # Parameters
    ///
    /// - `config`: Domain, credentials and record settings
    /// - `http_timeout`: Per-request timeout
    pub fn from_config(config: &ProviderConfig, http_timeout: Duration) -> Result<Self> {
        let transport = ReqwestTransport::new(http_timeout)?;
        Self::with_transport(config, Box::new(transport))
    }

    /// Create a provider over an arbitrary transport
    pub fn with_transport(
        config: &ProviderConfig,
        transport: Box<dyn HttpTransport>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            signer: RequestSigner::new(Credentials::new(
                config.secret_id.clone(),
                config.secret_key.clone(),
            )),
            domain: config.domain.clone(),
            signature_method: config.signature_method.clone(),
            subdomains: config.subdomains.clone(),
            record_line: config.record_line.clone(),
            ttl: config.ttl,
            dry_run: config.dry_run,
            transport,
        })
    }

    /// Sign and send one API action, returning the checked envelope
    async fn call(&self, action: &str, mut params: BTreeMap<String, String>) -> Result<Value> {
        params.insert("Action".to_string(), action.to_string());
        params.insert("domain".to_string(), self.domain.clone());

        let query = self.signer.sign(API_METHOD, &self.signature_method, params)?;
        let url = format!("{}?{}", API_URL, query);

        let body = self.transport.get(&url).await?;
        parse_envelope(action, &body)
    }

    /// List the records of `sub_domain`
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /v2/index.php?Action=RecordList&domain=example.com&subDomain=www&...
    /// ```
    pub async fn list_records(&self, sub_domain: &str) -> Result<Vec<DnsRecord>> {
        tracing::debug!("Listing records for {}.{}", sub_domain, self.domain);

        let params = BTreeMap::from([("subDomain".to_string(), sub_domain.to_string())]);
        let envelope = self.call("RecordList", params).await?;

        parse_records(&envelope, sub_domain)
    }

    /// Point the first "A" record of `sub_domain` at `ip`
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: A record was modified (or would have been, in dry-run)
    /// - `Ok(false)`: No "A" record exists; nothing was sent
    /// - `Err(Error)`: Listing or modifying failed
    pub async fn modify_record(&self, sub_domain: &str, ip: &str) -> Result<bool> {
        let records = self.list_records(sub_domain).await?;

        let Some(record) = records.iter().find(|r| r.record_type == "A") else {
            tracing::warn!("No A record for {}.{}, skipping", sub_domain, self.domain);
            return Ok(false);
        };

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would modify record {} ({}.{}): {} -> {}",
                record.id,
                sub_domain,
                self.domain,
                record.value,
                ip
            );
            return Ok(true);
        }

        let params = BTreeMap::from([
            ("recordId".to_string(), record.id.to_string()),
            ("subDomain".to_string(), sub_domain.to_string()),
            ("recordType".to_string(), "A".to_string()),
            ("recordLine".to_string(), self.record_line.clone()),
            ("value".to_string(), ip.to_string()),
            ("ttl".to_string(), self.ttl.to_string()),
        ]);
        let envelope = self.call("RecordModify", params).await?;

        tracing::info!(
            "Modified record {} ({}.{}) -> {}: {}",
            record.id,
            sub_domain,
            self.domain,
            ip,
            envelope["codeDesc"].as_str().unwrap_or("Success")
        );
        Ok(true)
    }
}

#[async_trait]
impl DnsProvider for TencentCnsProvider {
    async fn update_dns(&self, ip: &str) -> Result<DnsUpdate> {
        for sub_domain in &self.subdomains {
            self.modify_record(sub_domain, ip).await?;
        }

        if self.dry_run {
            Ok(DnsUpdate::DryRun)
        } else {
            Ok(DnsUpdate::Applied)
        }
    }

    fn provider_name(&self) -> &'static str {
        "tencent-cns"
    }
}

/// Parse a response body and check its status code
///
/// # Returns
///
/// - `Ok(Value)`: The envelope, `code` was 0
/// - `Err(Error::Provider)`: `code` was non-zero
/// - `Err(Error::MalformedResponse)`: Not JSON, or `code` missing / not a number
pub fn parse_envelope(action: &str, body: &str) -> Result<Value> {
    let envelope: Value = serde_json::from_str(body)
        .map_err(|e| Error::malformed(format!("{}: invalid JSON: {}", action, e)))?;

    let code = envelope
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::malformed(format!("{}: missing numeric \"code\"", action)))?;

    if code != 0 {
        let message = envelope
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .or_else(|| envelope.get("codeDesc").and_then(Value::as_str))
            .unwrap_or("unknown error");
        return Err(Error::provider(action, code, message));
    }

    Ok(envelope)
}

/// Extract `data.records[]` from a `RecordList` envelope
pub fn parse_records(envelope: &Value, sub_domain: &str) -> Result<Vec<DnsRecord>> {
    let records = envelope
        .pointer("/data/records")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::malformed("RecordList: \"data.records\" is not an array"))?;

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let field_error = |field: &str, kind: &str| {
                Error::malformed(format!(
                    "RecordList: records[{}].{} is not a {}",
                    i, field, kind
                ))
            };

            let id = record
                .get("id")
                .and_then(Value::as_u64)
                .ok_or_else(|| field_error("id", "number"))?;
            let record_type = record
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| field_error("type", "string"))?;
            let value = record
                .get("value")
                .and_then(Value::as_str)
                .ok_or_else(|| field_error("value", "string"))?;
            let name = record
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(sub_domain);

            Ok(DnsRecord {
                id,
                name: name.to_string(),
                record_type: record_type.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}
