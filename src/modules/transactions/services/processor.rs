use async_trait::async_trait;
use reqwest::header::HeaderMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::signature::SignatureVerifier;
use super::state_machine;
use crate::config::PayuConfig;
use crate::core::traits::PaymentProcessor;
use crate::core::{AppError, Currency, Result};
use crate::modules::gateways::models::{Buyer, NewOrder, Product, RefundRequest};
use crate::modules::gateways::services::PayuClient;
use crate::modules::transactions::models::{
    CallbackOutcome, ChargeResult, Notification, Payment, PaymentStatus, RefundStarted,
    ReleaseResult, TransactionResult, Transition,
};

pub const SLUG: &str = "payu";
pub const DISPLAY_NAME: &str = "PayU";

/// PayU backend for the host payment lifecycle
pub struct PayuProcessor {
    config: PayuConfig,
    client: Arc<PayuClient>,
    verifier: SignatureVerifier,
}

impl PayuProcessor {
    pub fn new(config: PayuConfig) -> Result<Self> {
        config.validate()?;
        let client = Arc::new(PayuClient::from_config(&config)?);
        Ok(Self::with_client(config, client))
    }

    /// Use an existing client, e.g. one shared with other components
    pub fn with_client(config: PayuConfig, client: Arc<PayuClient>) -> Self {
        let verifier =
            SignatureVerifier::new(config.second_key.clone()).allow_md5(config.allow_md5_callbacks);

        Self {
            config,
            client,
            verifier,
        }
    }

    pub fn client(&self) -> &Arc<PayuClient> {
        &self.client
    }

    pub fn verifier(&self) -> &SignatureVerifier {
        &self.verifier
    }

    /// Order creation input for `payment`
    pub fn build_order(&self, payment: &Payment, customer_ip: Option<&str>) -> Result<NewOrder> {
        let currency = payment.currency()?;
        currency.validate_amount(payment.amount)?;

        let mut order = NewOrder::new(payment.id.clone(), payment.amount, currency)
            .description(payment.description.clone())
            .pre_authorize(payment.pre_auth || self.config.pre_auth);

        if let Some(ip) = customer_ip {
            order = order.customer_ip(ip);
        }
        if let Some(url) = &self.config.notify_url {
            order = order.notify_url(url.clone());
        }
        if let Some(url) = &self.config.continue_url {
            order = order.continue_url(url.clone());
        }

        for item in &payment.items {
            order = order.product(Product::new(item.name.clone(), item.unit_price, item.quantity));
        }

        if let Some(buyer) = &payment.buyer {
            if let Some(email) = &buyer.email {
                order = order.buyer(Buyer {
                    email: email.clone(),
                    phone: buyer.phone.clone(),
                    first_name: buyer.first_name.clone(),
                    last_name: buyer.last_name.clone(),
                    ..Buyer::default()
                });
            }
        }

        Ok(order)
    }

    /// Decide the outcome of an already verified notification
    pub fn apply_notification(
        &self,
        payment: &Payment,
        notification: &Notification,
    ) -> Result<CallbackOutcome> {
        if let (Some(reported), Some(expected)) =
            (notification.provider_order_id(), payment.external_id.as_deref())
        {
            if reported != expected {
                warn!(
                    payment_id = %payment.id,
                    order_id = reported,
                    "Notification is for a different PayU order"
                );
                return Err(AppError::validation(format!(
                    "Notification order {} does not match payment {}",
                    reported, payment.id
                )));
            }
        }

        if let Some(order) = &notification.order {
            state_machine::on_order_status(payment.status, order.status)
        } else if let Some(refund) = &notification.refund {
            state_machine::on_refund_status(payment.status, refund.status, refund.amount)
        } else {
            Err(AppError::validation(
                "Notification carries neither order nor refund",
            ))
        }
    }

    fn check_refund_amount(payment: &Payment, amount: Option<Decimal>) -> Result<()> {
        let Some(amount) = amount else {
            return Ok(());
        };
        payment.currency()?.validate_amount(amount)?;

        if amount <= Decimal::ZERO {
            return Err(AppError::validation("Refund amount must be greater than 0"));
        }
        if amount > payment.amount {
            return Err(AppError::validation(format!(
                "Refund amount {} exceeds payment amount {}",
                amount, payment.amount
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentProcessor for PayuProcessor {
    fn slug(&self) -> &str {
        SLUG
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn accepted_currencies(&self) -> &[Currency] {
        &Currency::ALL
    }

    #[instrument(skip(self, payment), fields(payment_id = %payment.id))]
    async fn prepare_transaction(
        &self,
        payment: &Payment,
        customer_ip: Option<&str>,
    ) -> Result<TransactionResult> {
        if payment.status != PaymentStatus::Prepared {
            return Err(AppError::unexpected_state(format!(
                "cannot create an order for a payment in state {}",
                payment.status
            )));
        }

        let order = self.build_order(payment, customer_ip)?;
        let created = self.client.new_order(order).await?;

        if !created.status.is_accepted() {
            warn!(status = %created.status.status_code, "PayU accepted order with unexpected status");
        }

        Ok(TransactionResult {
            redirect_url: created.redirect_uri,
            provider_order_id: created.order_id,
            ext_order_id: created.ext_order_id.unwrap_or_else(|| payment.id.clone()),
            method: "GET",
            status: created.status.status_code,
        })
    }

    fn verify_callback(&self, body: &[u8], headers: &HeaderMap) -> Result<()> {
        self.verifier.verify_headers(body, headers)
    }

    #[instrument(skip(self, payment, body, headers), fields(payment_id = %payment.id, status = %payment.status))]
    async fn handle_callback(
        &self,
        payment: &Payment,
        body: &[u8],
        headers: &HeaderMap,
    ) -> Result<CallbackOutcome> {
        self.verify_callback(body, headers)?;
        let notification = Notification::parse(body)?;
        let outcome = self.apply_notification(payment, &notification)?;

        if let Some(t) = outcome.transition() {
            info!(transition = %t.transition, to = %t.to, "Callback accepted");
        }

        Ok(outcome)
    }

    #[instrument(skip(self, payment), fields(payment_id = %payment.id, status = %payment.status))]
    async fn fetch_payment_status(&self, payment: &Payment) -> Result<CallbackOutcome> {
        let order_id = payment.provider_order_id()?;
        let info = self.client.get_order_info(order_id).await?;

        let order = info.first_order().ok_or_else(|| {
            AppError::unexpected_state(format!("PayU returned no order for {}", order_id))
        })?;

        state_machine::on_order_status(payment.status, order.status)
    }

    #[instrument(skip(self, payment), fields(payment_id = %payment.id))]
    async fn charge(&self, payment: &Payment, amount: Option<Decimal>) -> Result<ChargeResult> {
        let transition = Transition::Charge.apply(payment.status)?;
        let order_id = payment.provider_order_id()?;

        let amount_charged = amount.unwrap_or(payment.amount);
        if amount_charged > payment.amount {
            return Err(AppError::validation(format!(
                "Charge amount {} exceeds locked amount {}",
                amount_charged, payment.amount
            )));
        }

        let response = self.client.capture(order_id).await?;
        let success = response.status.is_success();

        if success {
            info!(order_id, amount = %amount_charged, "Locked payment captured");
        } else {
            warn!(order_id, status = %response.status.status_code, "Capture not confirmed");
        }

        Ok(ChargeResult {
            amount_charged,
            success,
            transition: success.then_some(transition),
        })
    }

    #[instrument(skip(self, payment), fields(payment_id = %payment.id))]
    async fn release_lock(&self, payment: &Payment) -> Result<ReleaseResult> {
        let transition = Transition::Release.apply(payment.status)?;
        let order_id = payment.provider_order_id()?;

        let response = self.client.cancel_order(order_id).await?;

        if response.status.is_success() {
            info!(order_id, amount = %payment.amount, "Lock released");
            Ok(ReleaseResult {
                amount_released: payment.amount,
                transition: Some(transition),
            })
        } else {
            warn!(order_id, status = %response.status.status_code, "Lock release not confirmed");
            Ok(ReleaseResult {
                amount_released: Decimal::ZERO,
                transition: None,
            })
        }
    }

    #[instrument(skip(self, payment, description), fields(payment_id = %payment.id))]
    async fn start_refund(
        &self,
        payment: &Payment,
        amount: Option<Decimal>,
        description: Option<String>,
    ) -> Result<RefundStarted> {
        let transition = Transition::StartRefund.apply(payment.status)?;
        Self::check_refund_amount(payment, amount)?;
        let order_id = payment.provider_order_id()?;

        let mut request = match amount {
            Some(amount) => RefundRequest::partial(amount),
            None => RefundRequest::full(),
        };
        if let Some(description) = description {
            request = request.description(description);
        }

        let created = self.client.refund(order_id, &request).await?;

        Ok(RefundStarted {
            amount: amount.unwrap_or(payment.amount),
            refund_id: created.refund.refund_id,
            transition,
        })
    }
}
