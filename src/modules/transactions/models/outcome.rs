use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payment::StateTransition;

/// Why a notification left the payment untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnchangedReason {
    /// Payment is already in the state the notification leads to (replay)
    Duplicate,
    /// Notification belongs to an earlier phase than the current state
    Superseded,
    /// `NEW` / `PENDING`
    Informational,
}

/// Decision taken for one callback or status poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CallbackOutcome {
    Transitioned(StateTransition),
    Unchanged { reason: UnchangedReason },
}

impl CallbackOutcome {
    pub fn unchanged(reason: UnchangedReason) -> Self {
        CallbackOutcome::Unchanged { reason }
    }

    pub fn transition(&self) -> Option<&StateTransition> {
        match self {
            CallbackOutcome::Transitioned(t) => Some(t),
            CallbackOutcome::Unchanged { .. } => None,
        }
    }

    pub fn is_transition(&self) -> bool {
        self.transition().is_some()
    }
}

/// Result of `prepare_transaction`: where to send the buyer
#[derive(Debug, Clone, Serialize)]
pub struct TransactionResult {
    pub redirect_url: Option<String>,
    pub provider_order_id: String,
    pub ext_order_id: String,
    /// HTTP method the buyer's browser uses on `redirect_url`
    pub method: &'static str,
    /// Provider response status code, e.g. `SUCCESS` or `WARNING_CONTINUE_3DS`
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChargeResult {
    pub amount_charged: Decimal,
    pub success: bool,
    /// Present only when the capture succeeded
    pub transition: Option<StateTransition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReleaseResult {
    /// The locked amount, or zero if the provider refused the cancellation
    pub amount_released: Decimal,
    pub transition: Option<StateTransition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefundStarted {
    pub amount: Decimal,
    pub refund_id: String,
    pub transition: StateTransition,
}
