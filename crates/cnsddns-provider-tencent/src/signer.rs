// # Request Signer
//
// Canonical query-string signing for the CNS v2 API.
//
// ## Algorithm
//
// 1. Inject `Timestamp`, `Nonce` and `SecretId` into the parameters
// 2. Serialize `key=value` pairs joined by `&`, keys in byte-wise ascending
//    order, no trailing separator
// 3. HMAC over `METHOD + "cns.api.qcloud.com/v2/index.php" + "?" + query`,
//    keyed with the secret key
// 4. Base64 the digest, percent-encode it, append as `&Signature=`
//
// Values are signed raw, without percent-encoding. Only the signature
// itself is encoded.

use base64::{Engine, engine::general_purpose};
use cnsddns_core::{Error, Result};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Host and path covered by the signature
pub const API_HOST_PATH: &str = "cns.api.qcloud.com/v2/index.php";

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Keyed hash used to sign a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// `HmacSHA1`
    HmacSha1,
    /// `HmacSHA256`
    HmacSha256,
}

impl SignatureAlgorithm {
    /// Wire identifier of the algorithm
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureAlgorithm::HmacSha1 => "HmacSHA1",
            SignatureAlgorithm::HmacSha256 => "HmacSHA256",
        }
    }

    fn digest(&self, key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
        match self {
            SignatureAlgorithm::HmacSha1 => {
                let mut mac = HmacSha1::new_from_slice(key)
                    .map_err(|e| Error::config(format!("Invalid signing key: {}", e)))?;
                mac.update(message);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            SignatureAlgorithm::HmacSha256 => {
                let mut mac = HmacSha256::new_from_slice(key)
                    .map_err(|e| Error::config(format!("Invalid signing key: {}", e)))?;
                mac.update(message);
                Ok(mac.finalize().into_bytes().to_vec())
            }
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "HmacSHA1" => Ok(SignatureAlgorithm::HmacSha1),
            "HmacSHA256" => Ok(SignatureAlgorithm::HmacSha256),
            other => Err(Error::unsupported_algorithm(other)),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API key pair
#[derive(Clone)]
pub struct Credentials {
    secret_id: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }
}

// Never print the secret key
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<REDACTED>")
            .finish()
    }
}

/// Builds signed query strings for the CNS API
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Sign `params` with the current time and a fresh nonce
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: Canonical query string ending in `&Signature=...`
    /// - `Err(Error::UnsupportedSignatureAlgorithm)`: `algorithm` is not
    ///   `HmacSHA1` or `HmacSHA256`
    pub fn sign(
        &self,
        method: &str,
        algorithm: &str,
        params: BTreeMap<String, String>,
    ) -> Result<String> {
        let timestamp = chrono::Utc::now().timestamp();
        let nonce = rand::random::<u32>();
        self.sign_with(method, algorithm, params, timestamp, nonce)
    }

    /// Sign `params` with a fixed timestamp and nonce
    ///
    /// Deterministic: identical inputs always produce the same output.
    pub fn sign_with(
        &self,
        method: &str,
        algorithm: &str,
        mut params: BTreeMap<String, String>,
        timestamp: i64,
        nonce: u32,
    ) -> Result<String> {
        let algorithm: SignatureAlgorithm = algorithm.parse()?;

        params.insert("Timestamp".to_string(), timestamp.to_string());
        params.insert("Nonce".to_string(), nonce.to_string());
        params.insert("SecretId".to_string(), self.credentials.secret_id.clone());

        let query = canonical_query(&params);
        let plaintext = format!("{}{}?{}", method.to_uppercase(), API_HOST_PATH, query);

        let key = self.credentials.secret_key.as_bytes();
        let digest = algorithm.digest(key, plaintext.as_bytes())?;
        let signature = general_purpose::STANDARD.encode(digest);

        Ok(format!(
            "{}&Signature={}",
            query,
            urlencoding::encode(&signature)
        ))
    }
}

/// `key=value` pairs in ascending key order joined by `&`
pub fn canonical_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}
