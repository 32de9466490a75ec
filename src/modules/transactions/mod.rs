pub mod models;
pub mod services;

pub use models::{
    CallbackOutcome, ChargeResult, Notification, Payment, PaymentStatus, RefundStarted,
    ReleaseResult, StateTransition, TransactionResult, Transition, UnchangedReason,
};
pub use services::{PayuProcessor, SignatureVerifier};
