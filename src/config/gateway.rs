use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

pub const SANDBOX_URL: &str = "https://secure.snd.payu.com/";
pub const PRODUCTION_URL: &str = "https://secure.payu.com/";

/// PayU environment selected by the `sandbox` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayEnvironment {
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            GatewayEnvironment::Sandbox
        } else {
            GatewayEnvironment::Production
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            GatewayEnvironment::Sandbox => SANDBOX_URL,
            GatewayEnvironment::Production => PRODUCTION_URL,
        }
    }
}

impl std::fmt::Display for GatewayEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayEnvironment::Sandbox => write!(f, "sandbox"),
            GatewayEnvironment::Production => write!(f, "production"),
        }
    }
}

/// POS credentials bound to one API base URL.
///
/// Immutable once a client has been built from them.
#[derive(Clone)]
pub struct Credentials {
    pub pos_id: u64,
    pub second_key: String,
    pub oauth_id: u64,
    pub oauth_secret: String,
    pub base_url: Url,
}

impl Credentials {
    pub fn new(
        pos_id: u64,
        second_key: impl Into<String>,
        oauth_id: u64,
        oauth_secret: impl Into<String>,
        base_url: &str,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::configuration(format!("Invalid base URL '{}': {}", base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "Base URL '{}' cannot carry API paths",
                base_url
            )));
        }

        Ok(Self {
            pos_id,
            second_key: second_key.into(),
            oauth_id,
            oauth_secret: oauth_secret.into(),
            base_url,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("pos_id", &self.pos_id)
            .field("second_key", &"***")
            .field("oauth_id", &self.oauth_id)
            .field("oauth_secret", &"***")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
