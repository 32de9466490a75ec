use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub mod gateway;

pub use gateway::{Credentials, GatewayEnvironment};

/// PayU settings supplied by the host
#[derive(Clone, Deserialize)]
pub struct PayuConfig {
    pub pos_id: u64,
    pub second_key: String,
    pub oauth_id: u64,
    pub oauth_secret: String,
    #[serde(default = "default_sandbox")]
    pub sandbox: bool,
    /// Template, `{payment_id}` / `{order_id}` are substituted
    #[serde(default)]
    pub notify_url: Option<String>,
    #[serde(default)]
    pub continue_url: Option<String>,
    #[serde(default)]
    pub allow_md5_callbacks: bool,
    #[serde(default)]
    pub pre_auth: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_token_retries")]
    pub token_retries: u32,
}

fn default_sandbox() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_token_retries() -> u32 {
    2
}

impl PayuConfig {
    pub fn new(
        pos_id: u64,
        second_key: impl Into<String>,
        oauth_id: u64,
        oauth_secret: impl Into<String>,
    ) -> Self {
        Self {
            pos_id,
            second_key: second_key.into(),
            oauth_id,
            oauth_secret: oauth_secret.into(),
            sandbox: default_sandbox(),
            notify_url: None,
            continue_url: None,
            allow_md5_callbacks: false,
            pre_auth: false,
            request_timeout_secs: default_request_timeout_secs(),
            token_retries: default_token_retries(),
        }
    }

    /// Load configuration from `PAYU_*` environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = PayuConfig {
            pos_id: required("PAYU_POS_ID")?,
            second_key: env::var("PAYU_SECOND_KEY")
                .map_err(|_| AppError::configuration("PAYU_SECOND_KEY not set"))?,
            oauth_id: required("PAYU_OAUTH_ID")?,
            oauth_secret: env::var("PAYU_OAUTH_SECRET")
                .map_err(|_| AppError::configuration("PAYU_OAUTH_SECRET not set"))?,
            sandbox: optional("PAYU_SANDBOX", default_sandbox())?,
            notify_url: env::var("PAYU_NOTIFY_URL").ok().filter(|v| !v.is_empty()),
            continue_url: env::var("PAYU_CONTINUE_URL").ok().filter(|v| !v.is_empty()),
            allow_md5_callbacks: optional("PAYU_ALLOW_MD5_CALLBACKS", false)?,
            pre_auth: optional("PAYU_PRE_AUTH", false)?,
            request_timeout_secs: optional(
                "PAYU_REQUEST_TIMEOUT_SECS",
                default_request_timeout_secs(),
            )?,
            token_retries: optional("PAYU_TOKEN_RETRIES", default_token_retries())?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.pos_id == 0 {
            return Err(AppError::configuration("pos_id must be greater than 0"));
        }

        if self.oauth_id == 0 {
            return Err(AppError::configuration("oauth_id must be greater than 0"));
        }

        if self.second_key.trim().is_empty() {
            return Err(AppError::configuration("second_key must not be empty"));
        }

        if self.oauth_secret.trim().is_empty() {
            return Err(AppError::configuration("oauth_secret must not be empty"));
        }

        if self.request_timeout_secs == 0 {
            return Err(AppError::configuration(
                "Request timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    pub fn environment(&self) -> GatewayEnvironment {
        GatewayEnvironment::from_sandbox_flag(self.sandbox)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Credentials bound to the environment's API base URL
    pub fn credentials(&self) -> Result<Credentials> {
        self.credentials_for(self.environment().base_url())
    }

    /// Credentials bound to an explicit base URL (proxies, fake providers)
    pub fn credentials_for(&self, base_url: &str) -> Result<Credentials> {
        self.validate()?;
        Credentials::new(
            self.pos_id,
            self.second_key.clone(),
            self.oauth_id,
            self.oauth_secret.clone(),
            base_url,
        )
    }
}

impl std::fmt::Debug for PayuConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayuConfig")
            .field("pos_id", &self.pos_id)
            .field("second_key", &"***")
            .field("oauth_id", &self.oauth_id)
            .field("oauth_secret", &"***")
            .field("sandbox", &self.sandbox)
            .field("notify_url", &self.notify_url)
            .field("continue_url", &self.continue_url)
            .field("allow_md5_callbacks", &self.allow_md5_callbacks)
            .field("pre_auth", &self.pre_auth)
            .finish()
    }
}

fn required<T: FromStr>(name: &str) -> Result<T> {
    env::var(name)
        .map_err(|_| AppError::configuration(format!("{} not set", name)))?
        .trim()
        .parse()
        .map_err(|_| AppError::configuration(format!("Invalid {}", name)))
}

fn optional<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| AppError::configuration(format!("Invalid {}", name))),
        _ => Ok(default),
    }
}
