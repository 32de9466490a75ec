use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{lenient_string, lenient_string_opt, ResponseStatus};

/// Payout request. A missing `amount` pays out the whole available balance.
#[derive(Debug, Clone)]
pub struct PayoutRequest {
    pub shop_id: String,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub ext_payout_id: Option<String>,
}

impl PayoutRequest {
    pub fn new(shop_id: impl Into<String>) -> Self {
        Self {
            shop_id: shop_id.into(),
            amount: None,
            description: None,
            ext_payout_id: None,
        }
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn ext_payout_id(mut self, id: impl Into<String>) -> Self {
        self.ext_payout_id = Some(id.into());
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PayoutBody<'a> {
    pub shop_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout: Option<PayoutDetails<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PayoutDetails<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext_payout_id: Option<&'a str>,
}

impl<'a> From<&'a PayoutRequest> for PayoutBody<'a> {
    fn from(request: &'a PayoutRequest) -> Self {
        let has_details = request.amount.is_some()
            || request.description.is_some()
            || request.ext_payout_id.is_some();

        PayoutBody {
            shop_id: &request.shop_id,
            payout: has_details.then(|| PayoutDetails {
                amount: request.amount,
                description: request.description.as_deref(),
                ext_payout_id: request.ext_payout_id.as_deref(),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub payout_id: String,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub ext_payout_id: Option<String>,
    pub status: String,
}

/// Answer to payout creation and lookup
#[derive(Debug, Clone, Deserialize)]
pub struct PayoutResponse {
    pub payout: PayoutRecord,
    pub status: ResponseStatus,
}
