use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::{amount, AppError, Result};
use crate::modules::gateways::models::common::{lenient_string_opt, OrderStatus, RefundStatus};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotification {
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub ext_order_id: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundNotification {
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub refund_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub ext_refund_id: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency_code: Option<String>,
    pub status: RefundStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reason_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationProperty {
    pub name: String,
    pub value: serde_json::Value,
}

/// PUSH notification body, amounts already normalized
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default)]
    pub order: Option<OrderNotification>,
    #[serde(default)]
    pub refund: Option<RefundNotification>,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub ext_order_id: Option<String>,
    #[serde(default)]
    pub local_receipt_date_time: Option<String>,
    #[serde(default)]
    pub properties: Vec<NotificationProperty>,
}

impl Notification {
    /// Parse the exact callback bytes
    pub fn parse(body: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| AppError::validation(format!("Invalid notification body: {}", e)))?;

        let notification: Notification = serde_json::from_value(amount::normalize(raw)?)
            .map_err(|e| AppError::validation(format!("Invalid notification payload: {}", e)))?;

        if notification.order.is_none() && notification.refund.is_none() {
            return Err(AppError::validation(
                "Notification carries neither order nor refund",
            ));
        }

        Ok(notification)
    }

    /// PayU order id, taken from the order object or the top level
    pub fn provider_order_id(&self) -> Option<&str> {
        self.order
            .as_ref()
            .and_then(|o| o.order_id.as_deref())
            .or(self.order_id.as_deref())
    }
}
