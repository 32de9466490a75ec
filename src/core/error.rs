use reqwest::StatusCode;

/// Crate-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main error type for the PayU integration
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Missing or invalid settings, unsupported currency
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed input: amounts, payloads, refund ranges
    #[error("Validation error: {0}")]
    Validation(String),

    /// OAuth exchange rejected or retries exhausted
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Non-2xx answer from the provider
    #[error("Gateway error: HTTP {status}: {body}")]
    Gateway { status: u16, body: String },

    /// Callback signature missing, malformed or not matching
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Provider status not applicable to the current lifecycle state
    #[error("Unexpected state: {0}")]
    UnexpectedState(String),

    /// Transport failures and timeouts
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// HTTP status a host webhook or API endpoint should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Credentials(_) => StatusCode::BAD_GATEWAY,
            AppError::Gateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::InvalidSignature(_) => StatusCode::BAD_REQUEST,
            AppError::UnexpectedState(_) => StatusCode::CONFLICT,
            AppError::HttpClient(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn credentials(msg: impl Into<String>) -> Self {
        AppError::Credentials(msg.into())
    }

    pub fn gateway(status: StatusCode, body: impl Into<String>) -> Self {
        AppError::Gateway {
            status: status.as_u16(),
            body: body.into(),
        }
    }

    pub fn invalid_signature(msg: impl Into<String>) -> Self {
        AppError::InvalidSignature(msg.into())
    }

    pub fn unexpected_state(msg: impl Into<String>) -> Self {
        AppError::UnexpectedState(msg.into())
    }
}
