use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{AppError, Currency, Result};

/// Payment lifecycle state, owned and persisted by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Prepared,
    Locked,
    Paid,
    Failed,
    Refunding,
    Refunded,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Prepared
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Prepared => write!(f, "prepared"),
            PaymentStatus::Locked => write!(f, "locked"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Refunding => write!(f, "refunding"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "prepared" => Ok(PaymentStatus::Prepared),
            "locked" => Ok(PaymentStatus::Locked),
            "paid" => Ok(PaymentStatus::Paid),
            "failed" => Ok(PaymentStatus::Failed),
            "refunding" => Ok(PaymentStatus::Refunding),
            "refunded" => Ok(PaymentStatus::Refunded),
            _ => Err(AppError::validation(format!("Invalid payment status: {}", s))),
        }
    }
}

/// Order line as described by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuyerInfo {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// Host view of one payment.
///
/// This core reads it and never mutates it; changes come back as
/// [`StateTransition`] intents for the host to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    /// PayU order id, known once the order has been created
    pub external_id: Option<String>,
    pub currency: String,
    pub amount: Decimal,
    pub description: String,
    #[serde(default)]
    pub status: PaymentStatus,
    /// The order was created with funds reservation instead of immediate capture
    #[serde(default)]
    pub pre_auth: bool,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub buyer: Option<BuyerInfo>,
}

impl Payment {
    pub fn new(
        id: impl Into<String>,
        currency: impl Into<String>,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            external_id: None,
            currency: currency.into(),
            amount,
            description: description.into(),
            status: PaymentStatus::Prepared,
            pre_auth: false,
            items: Vec::new(),
            buyer: None,
        }
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_pre_auth(mut self, pre_auth: bool) -> Self {
        self.pre_auth = pre_auth;
        self
    }

    /// Parsed currency; unsupported codes are a configuration error
    pub fn currency(&self) -> Result<Currency> {
        self.currency.parse()
    }

    pub fn provider_order_id(&self) -> Result<&str> {
        self.external_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                AppError::validation(format!("Payment {} has no PayU order id yet", self.id))
            })
    }
}

/// Lifecycle action the host applies to a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    ConfirmPayment,
    Fail,
    ConfirmLock,
    Charge,
    Release,
    StartRefund,
    ConfirmRefund,
    CancelRefund,
}

impl Transition {
    /// States the transition may start from
    pub fn sources(&self) -> &'static [PaymentStatus] {
        use PaymentStatus::*;
        match self {
            Transition::ConfirmPayment => &[Prepared, Locked],
            Transition::Fail => &[Prepared, Locked],
            Transition::ConfirmLock => &[Prepared],
            Transition::Charge => &[Locked],
            Transition::Release => &[Locked],
            Transition::StartRefund => &[Paid],
            Transition::ConfirmRefund => &[Refunding],
            Transition::CancelRefund => &[Refunding],
        }
    }

    pub fn target(&self) -> PaymentStatus {
        match self {
            Transition::ConfirmPayment | Transition::Charge | Transition::CancelRefund => {
                PaymentStatus::Paid
            }
            Transition::Fail | Transition::Release => PaymentStatus::Failed,
            Transition::ConfirmLock => PaymentStatus::Locked,
            Transition::StartRefund => PaymentStatus::Refunding,
            Transition::ConfirmRefund => PaymentStatus::Refunded,
        }
    }

    pub fn can_start_from(&self, status: PaymentStatus) -> bool {
        self.sources().contains(&status)
    }

    /// Validated intent, or `UnexpectedState` when `from` is not a source
    pub fn apply(self, from: PaymentStatus) -> Result<StateTransition> {
        if !self.can_start_from(from) {
            return Err(AppError::unexpected_state(format!(
                "cannot {} a payment in state {}",
                self, from
            )));
        }

        Ok(StateTransition {
            transition: self,
            from,
            to: self.target(),
            amount: None,
        })
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transition::ConfirmPayment => "confirm_payment",
            Transition::Fail => "fail",
            Transition::ConfirmLock => "confirm_lock",
            Transition::Charge => "charge",
            Transition::Release => "release",
            Transition::StartRefund => "start_refund",
            Transition::ConfirmRefund => "confirm_refund",
            Transition::CancelRefund => "cancel_refund",
        };
        f.write_str(name)
    }
}

/// Transition validated by this core, for the host to persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub transition: Transition,
    pub from: PaymentStatus,
    pub to: PaymentStatus,
    /// Amount concerned, when the provider reported one (e.g. refunded amount)
    pub amount: Option<Decimal>,
}

impl StateTransition {
    pub fn with_amount(mut self, amount: Option<Decimal>) -> Self {
        self.amount = amount;
        self
    }
}
