use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{lenient_string, lenient_string_opt, RefundStatus, ResponseStatus};
use crate::core::Currency;

pub const DEFAULT_REFUND_DESCRIPTION: &str = "Refund";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundType {
    RefundPaymentStandard,
    Fast,
}

/// Refund request. A missing `amount` refunds the whole order.
#[derive(Debug, Clone, Default)]
pub struct RefundRequest {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub ext_refund_id: Option<String>,
    pub currency_code: Option<Currency>,
    pub bank_description: Option<String>,
    pub refund_type: Option<RefundType>,
}

impl RefundRequest {
    pub fn full() -> Self {
        Self::default()
    }

    pub fn partial(amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn ext_refund_id(mut self, id: impl Into<String>) -> Self {
        self.ext_refund_id = Some(id.into());
        self
    }

    pub fn is_partial(&self) -> bool {
        self.amount.is_some()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RefundEnvelope<'a> {
    pub refund: RefundBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefundBody<'a> {
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext_refund_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_description: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub refund_type: Option<RefundType>,
}

impl<'a> From<&'a RefundRequest> for RefundEnvelope<'a> {
    fn from(request: &'a RefundRequest) -> Self {
        RefundEnvelope {
            refund: RefundBody {
                description: request
                    .description
                    .as_deref()
                    .unwrap_or(DEFAULT_REFUND_DESCRIPTION),
                amount: request.amount,
                ext_refund_id: request.ext_refund_id.as_deref(),
                currency_code: request.currency_code,
                bank_description: request.bank_description.as_deref(),
                refund_type: request.refund_type,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub refund_id: String,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub ext_refund_id: Option<String>,
    pub amount: Decimal,
    pub currency_code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creation_date_time: Option<DateTime<FixedOffset>>,
    pub status: RefundStatus,
    #[serde(default)]
    pub status_date_time: Option<DateTime<FixedOffset>>,
}

/// Answer to `POST /api/v2_1/orders/{id}/refunds`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundCreated {
    #[serde(deserialize_with = "lenient_string")]
    pub order_id: String,
    pub refund: RefundRecord,
    pub status: ResponseStatus,
}

/// Answer to `GET /api/v2_1/orders/{id}/refunds`
#[derive(Debug, Clone, Deserialize)]
pub struct RefundList {
    #[serde(default)]
    pub refunds: Vec<RefundRecord>,
}
