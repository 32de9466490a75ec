//! Provider status to payment lifecycle decisions.
//!
//! Pure functions: they read the current [`PaymentStatus`] and the status
//! PayU reports and decide the intent. PUSH callbacks and PULL polls share
//! the same tables.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::core::{AppError, Result};
use crate::modules::gateways::models::{OrderStatus, RefundStatus};
use crate::modules::transactions::models::{
    CallbackOutcome, PaymentStatus, Transition, UnchangedReason,
};

use PaymentStatus::*;

/// Decide what an order status means for a payment in `current`
pub fn on_order_status(current: PaymentStatus, status: OrderStatus) -> Result<CallbackOutcome> {
    let outcome = match status {
        OrderStatus::New | OrderStatus::Pending => {
            CallbackOutcome::unchanged(UnchangedReason::Informational)
        }
        OrderStatus::Completed => match current {
            Prepared | Locked => transition(Transition::ConfirmPayment, current, None)?,
            Paid | Refunding | Refunded => CallbackOutcome::unchanged(UnchangedReason::Duplicate),
            Failed => return Err(unexpected("COMPLETED", current)),
        },
        OrderStatus::Canceled => match current {
            Prepared | Locked => transition(Transition::Fail, current, None)?,
            Failed => CallbackOutcome::unchanged(UnchangedReason::Duplicate),
            Paid | Refunding | Refunded => return Err(unexpected("CANCELED", current)),
        },
        OrderStatus::WaitingForConfirmation => match current {
            Prepared => transition(Transition::ConfirmLock, current, None)?,
            Locked => CallbackOutcome::unchanged(UnchangedReason::Duplicate),
            Paid | Failed | Refunding | Refunded => {
                CallbackOutcome::unchanged(UnchangedReason::Superseded)
            }
        },
        OrderStatus::Unknown => {
            return Err(AppError::unexpected_state(format!(
                "unrecognised order status for payment in state {}",
                current
            )))
        }
    };

    log_decision("order", &status.to_string(), current, &outcome);
    Ok(outcome)
}

/// Decide what a refund status means; `amount` is the refunded amount PayU reported
pub fn on_refund_status(
    current: PaymentStatus,
    status: RefundStatus,
    amount: Option<Decimal>,
) -> Result<CallbackOutcome> {
    let outcome = match status {
        RefundStatus::Pending => CallbackOutcome::unchanged(UnchangedReason::Informational),
        RefundStatus::Finalized => match current {
            Refunding => transition(Transition::ConfirmRefund, current, amount)?,
            Refunded => CallbackOutcome::unchanged(UnchangedReason::Duplicate),
            _ => {
                return Err(AppError::unexpected_state(format!(
                    "refund FINALIZED but no refund pending (payment is {})",
                    current
                )))
            }
        },
        RefundStatus::Canceled => match current {
            Refunding => transition(Transition::CancelRefund, current, None)?,
            Paid => CallbackOutcome::unchanged(UnchangedReason::Duplicate),
            _ => return Err(unexpected("refund CANCELED", current)),
        },
        RefundStatus::Unknown => {
            return Err(AppError::unexpected_state(format!(
                "unrecognised refund status for payment in state {}",
                current
            )))
        }
    };

    log_decision("refund", &status.to_string(), current, &outcome);
    Ok(outcome)
}

fn transition(
    transition: Transition,
    current: PaymentStatus,
    amount: Option<Decimal>,
) -> Result<CallbackOutcome> {
    Ok(CallbackOutcome::Transitioned(
        transition.apply(current)?.with_amount(amount),
    ))
}

fn unexpected(status: &str, current: PaymentStatus) -> AppError {
    warn!(status, payment_status = %current, "Provider status not valid for payment state");
    AppError::unexpected_state(format!("{} reported for payment in state {}", status, current))
}

fn log_decision(kind: &str, status: &str, current: PaymentStatus, outcome: &CallbackOutcome) {
    match outcome {
        CallbackOutcome::Transitioned(t) => debug!(
            kind,
            status,
            from = %t.from,
            to = %t.to,
            transition = %t.transition,
            "Status leads to transition"
        ),
        CallbackOutcome::Unchanged { reason } => debug!(
            kind,
            status,
            payment_status = %current,
            reason = ?reason,
            "Status leaves payment unchanged"
        ),
    }
}
