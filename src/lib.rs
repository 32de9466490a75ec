//! PayU Payment Gateway Integration Library
//!
//! Amount codec, OAuth token management, the PayU REST client, notification
//! signature verification and the payment lifecycle state machine.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use crate::config::PayuConfig;
pub use crate::core::{AppError, Currency, Result};
pub use modules::gateways;
pub use modules::transactions;
