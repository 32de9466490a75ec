use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::core::amount;

/// Order status reported by PayU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    Pending,
    Canceled,
    Completed,
    WaitingForConfirmation,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::New => "NEW",
            OrderStatus::Pending => "PENDING",
            OrderStatus::Canceled => "CANCELED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::WaitingForConfirmation => "WAITING_FOR_CONFIRMATION",
            OrderStatus::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Refund status reported by PayU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundStatus {
    Pending,
    Finalized,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefundStatus::Pending => "PENDING",
            RefundStatus::Finalized => "FINALIZED",
            RefundStatus::Canceled => "CANCELED",
            RefundStatus::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// `status` object carried by most PayU responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStatus {
    pub status_code: String,
    #[serde(default)]
    pub status_desc: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub code_literal: Option<String>,
}

impl ResponseStatus {
    pub const SUCCESS: &'static str = "SUCCESS";
    pub const WARNING_CONTINUE_REDIRECT: &'static str = "WARNING_CONTINUE_REDIRECT";
    pub const WARNING_CONTINUE_3DS: &'static str = "WARNING_CONTINUE_3DS";
    pub const WARNING_CONTINUE_CVV: &'static str = "WARNING_CONTINUE_CVV";

    pub fn is_success(&self) -> bool {
        self.status_code == Self::SUCCESS
    }

    /// Success, or a warning asking the buyer to continue elsewhere
    pub fn is_accepted(&self) -> bool {
        self.is_success() || self.status_code.starts_with("WARNING_CONTINUE")
    }
}

/// Accepts `"123"` as well as `123` for identifier-like fields.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

pub(crate) fn lenient_string_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// Minor-unit limits outside the convertible key set (`minAmount`, `maxAmount`).
pub(crate) fn minor_units_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match lenient_string_opt(deserializer)? {
        Some(raw) => amount::from_wire(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
