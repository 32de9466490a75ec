pub mod notification;
pub mod outcome;
pub mod payment;

pub use notification::{Notification, OrderNotification, RefundNotification};
pub use outcome::{
    CallbackOutcome, ChargeResult, RefundStarted, ReleaseResult, TransactionResult,
    UnchangedReason,
};
pub use payment::{BuyerInfo, OrderItem, Payment, PaymentStatus, StateTransition, Transition};
