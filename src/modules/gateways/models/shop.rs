use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::common::{lenient_string, minor_units_opt, ResponseStatus};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub currency_code: String,
    pub total: Decimal,
    pub available: Decimal,
}

/// Answer to `GET /api/v2_1/shops/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub shop_id: String,
    pub name: String,
    pub currency_code: String,
    pub balance: Balance,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayByLink {
    pub value: String,
    pub name: String,
    #[serde(default)]
    pub brand_image_url: Option<String>,
    pub status: String,
    #[serde(default, deserialize_with = "minor_units_opt")]
    pub min_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "minor_units_opt")]
    pub max_amount: Option<Decimal>,
}

impl PayByLink {
    pub fn is_enabled(&self) -> bool {
        self.status == "ENABLED"
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardToken {
    pub value: String,
    #[serde(default)]
    pub card_number_masked: Option<String>,
    #[serde(default)]
    pub card_brand: Option<String>,
    #[serde(default)]
    pub card_expiration_month: Option<Value>,
    #[serde(default)]
    pub card_expiration_year: Option<Value>,
    #[serde(default)]
    pub preferred: bool,
    #[serde(default)]
    pub status: Option<String>,
}

/// Answer to `GET /api/v2_1/paymethods`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayMethods {
    #[serde(default)]
    pub card_tokens: Vec<CardToken>,
    #[serde(default)]
    pub pex_tokens: Vec<Value>,
    #[serde(default)]
    pub pay_by_links: Vec<PayByLink>,
    #[serde(default)]
    pub status: Option<ResponseStatus>,
}

impl PayMethods {
    pub fn enabled_pay_by_links(&self) -> impl Iterator<Item = &PayByLink> {
        self.pay_by_links.iter().filter(|m| m.is_enabled())
    }
}
