use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{lenient_string, lenient_string_opt, OrderStatus, ResponseStatus};
use crate::core::Currency;

pub const DEFAULT_CUSTOMER_IP: &str = "127.0.0.1";
pub const DEFAULT_DESCRIPTION: &str = "Payment order";
pub const DEFAULT_PRODUCT_NAME: &str = "Total order";

/// Order line sent to PayU
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(rename = "virtual", skip_serializing_if = "Option::is_none")]
    pub is_virtual: Option<bool>,
}

impl Product {
    pub fn new(name: impl Into<String>, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
            is_virtual: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext_customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Caller-facing order creation input.
///
/// Amounts are decimals; the client converts them to minor units on the way out.
/// `notify_url` and `continue_url` may contain `{payment_id}` or `{order_id}`,
/// both resolve to `order_id`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub description: Option<String>,
    pub customer_ip: Option<String>,
    pub buyer: Option<Buyer>,
    pub products: Vec<Product>,
    pub notify_url: Option<String>,
    pub continue_url: Option<String>,
    pub validity_time: Option<u64>,
    pub additional_description: Option<String>,
    pub visible_description: Option<String>,
    pub statement_description: Option<String>,
    pub card_on_file: Option<String>,
    pub recurring: Option<String>,
    /// Funds are expected to be reserved (`WAITING_FOR_CONFIRMATION`) instead of captured
    pub pre_authorize: bool,
    /// Merged into the request body last
    pub extra: Map<String, Value>,
}

impl NewOrder {
    pub fn new(order_id: impl Into<String>, amount: Decimal, currency: Currency) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            currency,
            description: None,
            customer_ip: None,
            buyer: None,
            products: Vec::new(),
            notify_url: None,
            continue_url: None,
            validity_time: None,
            additional_description: None,
            visible_description: None,
            statement_description: None,
            card_on_file: None,
            recurring: None,
            pre_authorize: false,
            extra: Map::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn customer_ip(mut self, ip: impl Into<String>) -> Self {
        self.customer_ip = Some(ip.into());
        self
    }

    pub fn buyer(mut self, buyer: Buyer) -> Self {
        self.buyer = Some(buyer);
        self
    }

    pub fn product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    pub fn notify_url(mut self, template: impl Into<String>) -> Self {
        self.notify_url = Some(template.into());
        self
    }

    pub fn continue_url(mut self, template: impl Into<String>) -> Self {
        self.continue_url = Some(template.into());
        self
    }

    pub fn validity_time(mut self, seconds: u64) -> Self {
        self.validity_time = Some(seconds);
        self
    }

    pub fn pre_authorize(mut self, enabled: bool) -> Self {
        self.pre_authorize = enabled;
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// `POST /api/v2_1/orders` body before minor-unit conversion
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderCreateRequest<'a> {
    pub ext_order_id: &'a str,
    pub customer_ip: &'a str,
    pub merchant_pos_id: String,
    pub description: &'a str,
    pub currency_code: Currency,
    pub total_amount: Decimal,
    pub products: Vec<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<&'a Buyer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continue_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_on_file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<&'a str>,
}

/// Answer to order creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    #[serde(deserialize_with = "lenient_string")]
    pub order_id: String,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub ext_order_id: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    pub status: ResponseStatus,
}

/// Answer to `DELETE /api/v2_1/orders/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationResponse {
    #[serde(deserialize_with = "lenient_string")]
    pub order_id: String,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub ext_order_id: Option<String>,
    pub status: ResponseStatus,
}

/// Answer to `POST /api/v2_1/orders/{id}/captures`
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureResponse {
    pub status: ResponseStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    pub unit_price: Decimal,
    #[serde(deserialize_with = "lenient_string")]
    pub quantity: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(deserialize_with = "lenient_string")]
    pub order_id: String,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub ext_order_id: Option<String>,
    #[serde(default)]
    pub order_create_date: Option<String>,
    #[serde(default)]
    pub notify_url: Option<String>,
    #[serde(default)]
    pub customer_ip: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub merchant_pos_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub currency_code: String,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

/// Answer to `GET /api/v2_1/orders/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInfo {
    #[serde(default)]
    pub orders: Vec<OrderDetails>,
    pub status: ResponseStatus,
}

impl OrderInfo {
    pub fn first_order(&self) -> Option<&OrderDetails> {
        self.orders.first()
    }
}

/// Answer to `GET /api/v2_1/orders/{id}/transactions`
///
/// Transaction payloads differ per payment method and are kept as JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsResponse {
    #[serde(default)]
    pub transactions: Vec<Value>,
}
