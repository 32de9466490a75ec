use reqwest::{redirect, Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::token_manager::{AccessToken, TokenManager};
use crate::config::{Credentials, PayuConfig};
use crate::core::{amount, AppError, Result};
use crate::modules::gateways::models::order::{
    OrderCreateRequest, DEFAULT_CUSTOMER_IP, DEFAULT_DESCRIPTION, DEFAULT_PRODUCT_NAME,
};
use crate::modules::gateways::models::payout::PayoutBody;
use crate::modules::gateways::models::refund::RefundEnvelope;
use crate::modules::gateways::models::{
    CancellationResponse, CaptureResponse, NewOrder, OrderCreated, OrderInfo, PayMethods,
    PayoutRequest, PayoutResponse, Product, RefundCreated, RefundList, RefundRecord,
    RefundRequest, ShopInfo, TransactionsResponse,
};

const API_PREFIX: [&str; 2] = ["api", "v2_1"];
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_TOKEN_RETRIES: u32 = 2;

const OK: &[StatusCode] = &[StatusCode::OK];
const ORDER_CREATED: &[StatusCode] = &[StatusCode::OK, StatusCode::CREATED, StatusCode::FOUND];
const TOKEN_DELETED: &[StatusCode] = &[StatusCode::OK, StatusCode::NO_CONTENT];

/// Substitutes `{payment_id}` and `{order_id}` with the same identifier
pub fn resolve_url_template(template: &str, id: &str) -> String {
    template.replace("{payment_id}", id).replace("{order_id}", id)
}

/// PayU REST API client
///
/// API Documentation: https://developers.payu.com/europe/api/
///
/// The underlying connection pool lives as long as the client and is released
/// when it is dropped. Share one instance (e.g. behind an `Arc`) so repeated
/// calls reuse connections. Redirects are never followed: order creation
/// answers `302` with a JSON body.
pub struct PayuClient {
    http: Client,
    credentials: Credentials,
    tokens: TokenManager,
}

impl PayuClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_options(credentials, DEFAULT_TIMEOUT, DEFAULT_TOKEN_RETRIES)
    }

    /// `timeout` bounds every request; `token_retries` applies to the token exchange only
    pub fn with_options(credentials: Credentials, timeout: Duration, token_retries: u32) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| AppError::configuration(format!("Cannot build HTTP client: {}", e)))?;

        let tokens = TokenManager::new(http.clone(), &credentials, token_retries)?;

        Ok(Self {
            http,
            credentials,
            tokens,
        })
    }

    pub fn from_config(config: &PayuConfig) -> Result<Self> {
        Self::with_options(
            config.credentials()?,
            config.request_timeout(),
            config.token_retries,
        )
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.credentials.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::configuration("Base URL cannot carry API paths"))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    /// Pre-call hook: ensure a valid bearer token before any API request
    async fn authorize(&self) -> Result<AccessToken> {
        self.tokens.token().await
    }

    /// Sends one authenticated request and returns the normalized JSON body.
    ///
    /// Outbound bodies are centified first. A `401` invalidates the token and
    /// the request is repeated once with a fresh one.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        accepted: &[StatusCode],
    ) -> Result<Value> {
        let body = body.map(amount::centify).transpose()?;
        let mut reauthorized = false;

        loop {
            let token = self.authorize().await?;

            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(token.value());
            if let Some(payload) = &body {
                request = request.json(payload);
            }

            debug!(method = %method, path = url.path(), "Calling PayU API");

            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    warn!(path = url.path(), "PayU API request timed out");
                } else {
                    error!(path = url.path(), error = %e, "PayU API request failed");
                }
                AppError::HttpClient(e)
            })?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED && !reauthorized {
                warn!(path = url.path(), "PayU rejected access token, re-authenticating once");
                self.tokens.invalidate(&token).await;
                reauthorized = true;
                continue;
            }

            let text = response.text().await?;

            if !accepted.contains(&status) {
                error!(
                    method = %method,
                    path = url.path(),
                    status = status.as_u16(),
                    "PayU API returned an error"
                );
                return Err(AppError::gateway(status, text));
            }

            let value = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text)?
            };

            return amount::normalize(value);
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        accepted: &[StatusCode],
    ) -> Result<T> {
        let value = self.send(method, url, body, accepted).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn to_body<T: Serialize>(payload: &T) -> Result<Value> {
        Ok(serde_json::to_value(payload)?)
    }

    /// Register a new order
    #[instrument(skip(self, order), fields(order_id = %order.order_id, currency = %order.currency))]
    pub async fn new_order(&self, order: NewOrder) -> Result<OrderCreated> {
        order.currency.validate_amount(order.amount)?;

        let products = if order.products.is_empty() {
            vec![Product::new(DEFAULT_PRODUCT_NAME, order.amount, 1)]
        } else {
            order.products.clone()
        };

        let request = OrderCreateRequest {
            ext_order_id: &order.order_id,
            customer_ip: order.customer_ip.as_deref().unwrap_or(DEFAULT_CUSTOMER_IP),
            merchant_pos_id: self.credentials.pos_id.to_string(),
            description: order.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION),
            currency_code: order.currency,
            total_amount: order.amount,
            products,
            buyer: order.buyer.as_ref(),
            notify_url: order
                .notify_url
                .as_deref()
                .map(|t| resolve_url_template(t, &order.order_id)),
            continue_url: order
                .continue_url
                .as_deref()
                .map(|t| resolve_url_template(t, &order.order_id)),
            validity_time: order.validity_time,
            additional_description: order.additional_description.as_deref(),
            visible_description: order.visible_description.as_deref(),
            statement_description: order.statement_description.as_deref(),
            card_on_file: order.card_on_file.as_deref(),
            recurring: order.recurring.as_deref(),
        };

        let mut body = Self::to_body(&request)?;
        if let Value::Object(map) = &mut body {
            for (key, value) in &order.extra {
                map.insert(key.clone(), value.clone());
            }
        }

        let url = self.endpoint(&["orders"])?;
        let created: OrderCreated = self.call(Method::POST, url, Some(body), ORDER_CREATED).await?;

        info!(
            provider_order_id = %created.order_id,
            status = %created.status.status_code,
            pre_authorize = order.pre_authorize,
            "PayU order created"
        );

        Ok(created)
    }

    /// Cancel an order; for a pre-authorized order this releases the lock
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: &str) -> Result<CancellationResponse> {
        let url = self.endpoint(&["orders", order_id])?;
        self.call(Method::DELETE, url, None, OK).await
    }

    /// Capture (charge) a pre-authorized order
    #[instrument(skip(self))]
    pub async fn capture(&self, order_id: &str) -> Result<CaptureResponse> {
        let url = self.endpoint(&["orders", order_id, "captures"])?;
        self.call(Method::POST, url, None, OK).await
    }

    #[instrument(skip(self))]
    pub async fn get_order_info(&self, order_id: &str) -> Result<OrderInfo> {
        let url = self.endpoint(&["orders", order_id])?;
        self.call(Method::GET, url, None, OK).await
    }

    /// Request a refund; a request without amount refunds the whole order
    #[instrument(skip(self, request), fields(partial = request.is_partial()))]
    pub async fn refund(&self, order_id: &str, request: &RefundRequest) -> Result<RefundCreated> {
        let body = Self::to_body(&RefundEnvelope::from(request))?;
        let url = self.endpoint(&["orders", order_id, "refunds"])?;
        let created: RefundCreated = self.call(Method::POST, url, Some(body), OK).await?;

        info!(
            refund_id = %created.refund.refund_id,
            amount = %created.refund.amount,
            "PayU refund requested"
        );

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_refunds(&self, order_id: &str) -> Result<RefundList> {
        let url = self.endpoint(&["orders", order_id, "refunds"])?;
        self.call(Method::GET, url, None, OK).await
    }

    #[instrument(skip(self))]
    pub async fn get_refund(&self, order_id: &str, refund_id: &str) -> Result<RefundRecord> {
        let url = self.endpoint(&["orders", order_id, "refunds", refund_id])?;
        self.call(Method::GET, url, None, OK).await
    }

    /// Payment methods available to the POS; `lang` is an ISO 639-1 code
    #[instrument(skip(self))]
    pub async fn get_payment_methods(&self, lang: Option<&str>) -> Result<PayMethods> {
        let mut url = self.endpoint(&["paymethods"])?;
        if let Some(lang) = lang {
            url.query_pairs_mut().append_pair("lang", lang);
        }
        self.call(Method::GET, url, None, OK).await
    }

    #[instrument(skip(self))]
    pub async fn get_transactions(&self, order_id: &str) -> Result<TransactionsResponse> {
        let url = self.endpoint(&["orders", order_id, "transactions"])?;
        self.call(Method::GET, url, None, OK).await
    }

    #[instrument(skip(self))]
    pub async fn get_shop_info(&self, shop_id: &str) -> Result<ShopInfo> {
        let url = self.endpoint(&["shops", shop_id])?;
        self.call(Method::GET, url, None, OK).await
    }

    /// Withdraw funds; without an amount the full available balance is paid out
    #[instrument(skip(self, request), fields(shop_id = %request.shop_id))]
    pub async fn create_payout(&self, request: &PayoutRequest) -> Result<PayoutResponse> {
        let body = Self::to_body(&PayoutBody::from(request))?;
        let url = self.endpoint(&["payouts"])?;
        self.call(Method::POST, url, Some(body), OK).await
    }

    #[instrument(skip(self))]
    pub async fn get_payout(&self, payout_id: &str) -> Result<PayoutResponse> {
        let url = self.endpoint(&["payouts", payout_id])?;
        self.call(Method::GET, url, None, OK).await
    }

    /// Delete a stored card-on-file token
    #[instrument(skip(self, token))]
    pub async fn delete_token(&self, token: &str) -> Result<()> {
        let url = self.endpoint(&["tokens", token])?;
        self.send(Method::DELETE, url, None, TOKEN_DELETED).await?;
        Ok(())
    }
}
