use reqwest::header::HeaderMap;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::core::{AppError, Result};

/// Header names PayU signs notifications under, checked in order
pub const SIGNATURE_HEADERS: [&str; 2] = ["openpayu-signature", "x-openpayu-signature"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    Md5,
    Sha256,
}

impl FromStr for SignatureAlgorithm {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MD5" => Ok(SignatureAlgorithm::Md5),
            "SHA-256" | "SHA256" => Ok(SignatureAlgorithm::Sha256),
            other => Err(AppError::invalid_signature(format!(
                "unsupported signature algorithm '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureAlgorithm::Md5 => write!(f, "MD5"),
            SignatureAlgorithm::Sha256 => write!(f, "SHA-256"),
        }
    }
}

/// Parsed `OpenPayu-Signature` value.
///
/// Format: `sender=checkout;signature=<hex>;algorithm=SHA-256;content=DOCUMENT`.
/// Unknown keys are ignored; a missing `algorithm` means SHA-256 unless the
/// caller picks another default through [`SignatureHeader::parse_with_default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub algorithm: SignatureAlgorithm,
    pub signature: String,
}

impl SignatureHeader {
    pub fn parse(value: &str) -> Result<Self> {
        Self::parse_with_default(value, SignatureAlgorithm::Sha256)
    }

    pub fn parse_with_default(value: &str, default: SignatureAlgorithm) -> Result<Self> {
        let mut signature = None;
        let mut algorithm = None;

        for part in value.split(';') {
            let Some((key, val)) = part.split_once('=') else {
                continue;
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "signature" => signature = Some(val.trim().to_ascii_lowercase()),
                "algorithm" => algorithm = Some(val.parse::<SignatureAlgorithm>()?),
                _ => {}
            }
        }

        let signature = signature
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::invalid_signature("NO SIGNATURE"))?;

        Ok(Self {
            algorithm: algorithm.unwrap_or(default),
            signature,
        })
    }
}

/// Checks PUSH notifications against the POS second key
#[derive(Clone)]
pub struct SignatureVerifier {
    second_key: String,
    allow_md5: bool,
}

impl SignatureVerifier {
    pub fn new(second_key: impl Into<String>) -> Self {
        Self {
            second_key: second_key.into(),
            allow_md5: false,
        }
    }

    /// Accept legacy MD5 signatures; headers without `algorithm` are then read as MD5
    pub fn allow_md5(mut self, allow: bool) -> Self {
        self.allow_md5 = allow;
        self
    }

    /// Lowercase hex of `hash(body || second_key)`
    pub fn digest(&self, algorithm: SignatureAlgorithm, body: &[u8]) -> String {
        match algorithm {
            SignatureAlgorithm::Md5 => {
                let mut input = Vec::with_capacity(body.len() + self.second_key.len());
                input.extend_from_slice(body);
                input.extend_from_slice(self.second_key.as_bytes());
                hex::encode(md5::compute(&input).0)
            }
            SignatureAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(body);
                hasher.update(self.second_key.as_bytes());
                hex::encode(hasher.finalize())
            }
        }
    }

    /// Verify one header value against the exact body bytes
    pub fn verify(&self, body: &[u8], header_value: &str) -> Result<()> {
        let default = if self.allow_md5 {
            SignatureAlgorithm::Md5
        } else {
            SignatureAlgorithm::Sha256
        };
        let header = SignatureHeader::parse_with_default(header_value, default)?;

        if header.algorithm == SignatureAlgorithm::Md5 && !self.allow_md5 {
            warn!("Rejected MD5-signed notification");
            return Err(AppError::invalid_signature("MD5 signatures are disabled"));
        }

        let expected = self.digest(header.algorithm, body);
        if bool::from(expected.as_bytes().ct_eq(header.signature.as_bytes())) {
            Ok(())
        } else {
            warn!(algorithm = %header.algorithm, "Notification signature mismatch");
            Err(AppError::invalid_signature("BAD SIGNATURE"))
        }
    }

    /// Locate the signature header and verify it
    pub fn verify_headers(&self, body: &[u8], headers: &HeaderMap) -> Result<()> {
        let value = SIGNATURE_HEADERS
            .iter()
            .find_map(|name| headers.get(*name))
            .ok_or_else(|| {
                warn!("Notification without signature header");
                AppError::invalid_signature("NO SIGNATURE")
            })?
            .to_str()
            .map_err(|_| AppError::invalid_signature("signature header is not ASCII"))?;

        self.verify(body, value)
    }

    pub fn is_valid(&self, body: &[u8], header_value: &str) -> bool {
        self.verify(body, header_value).is_ok()
    }
}

impl fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("second_key", &"***")
            .field("allow_md5", &self.allow_md5)
            .finish()
    }
}
