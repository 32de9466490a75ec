use async_trait::async_trait;
use reqwest::header::HeaderMap;
use rust_decimal::Decimal;

use crate::core::{Currency, Result};
use crate::modules::transactions::models::{
    CallbackOutcome, ChargeResult, Payment, RefundStarted, ReleaseResult, TransactionResult,
};

/// Capability interface a payment backend exposes to the host.
///
/// Implementations never mutate the [`Payment`] they are given; every
/// lifecycle change is returned as an intent for the host to persist.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Registry key, e.g. `payu`
    fn slug(&self) -> &str;

    fn display_name(&self) -> &str;

    fn accepted_currencies(&self) -> &[Currency];

    /// Register the order with the provider and return the buyer redirect
    async fn prepare_transaction(
        &self,
        payment: &Payment,
        customer_ip: Option<&str>,
    ) -> Result<TransactionResult>;

    /// Check the signature of a raw callback body
    fn verify_callback(&self, body: &[u8], headers: &HeaderMap) -> Result<()>;

    /// Verify, parse and decide what a PUSH notification means for `payment`
    async fn handle_callback(
        &self,
        payment: &Payment,
        body: &[u8],
        headers: &HeaderMap,
    ) -> Result<CallbackOutcome>;

    /// PULL the current order status and decide as for a callback
    async fn fetch_payment_status(&self, payment: &Payment) -> Result<CallbackOutcome>;

    /// Capture a locked payment.
    ///
    /// PayU always captures the full order. A partial `amount` is checked
    /// against the locked amount and reported back as `amount_charged`, but
    /// it is not sent to PayU.
    async fn charge(&self, payment: &Payment, amount: Option<Decimal>) -> Result<ChargeResult>;

    /// Cancel a lock without charging
    async fn release_lock(&self, payment: &Payment) -> Result<ReleaseResult>;

    /// Request a refund; `None` refunds the whole payment
    async fn start_refund(
        &self,
        payment: &Payment,
        amount: Option<Decimal>,
        description: Option<String>,
    ) -> Result<RefundStarted>;
}
