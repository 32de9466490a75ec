// Integration tests for the PayU REST client
//
// Every endpoint is called against a fake provider to check paths, bearer
// authentication, minor-unit conversion of bodies and error surfacing.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use payu_gateway::gateways::{
    Buyer, NewOrder, OrderStatus, PayoutRequest, Product, RefundRequest, RefundStatus,
};
use payu_gateway::{AppError, Currency};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BEARER: &str = "Bearer 3e5cac39-7e38-4139-8fd6-30adc06a61bd";

fn success() -> serde_json::Value {
    json!({"statusCode": "SUCCESS"})
}

#[tokio::test]
async fn test_new_order_sends_minor_units() {
    let server = start_provider().await;
    Mock::given(method("POST"))
        .and(path("/api/v2_1/orders"))
        .and(header("authorization", BEARER))
        .and(body_partial_json(json!({
            "extOrderId": "pay-1",
            "merchantPosId": "300746",
            "customerIp": "127.0.0.1",
            "description": "Payment order",
            "currencyCode": "PLN",
            "totalAmount": "2999",
            "notifyUrl": "https://shop.example/payments/pay-1/notify",
            "continueUrl": "https://shop.example/payments/pay-1/done",
            "products": [{"name": "Total order", "unitPrice": "2999", "quantity": 1}]
        })))
        .respond_with(ResponseTemplate::new(302).set_body_json(json!({
            "status": success(),
            "redirectUri": "https://merch-prod.snd.payu.com/pay/?orderId=WZHF5FFDRJ140731GUEST000P01",
            "orderId": PROVIDER_ORDER_ID,
            "extOrderId": "pay-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let order = NewOrder::new("pay-1", dec!(29.99), Currency::PLN)
        .notify_url("https://shop.example/payments/{payment_id}/notify")
        .continue_url("https://shop.example/payments/{order_id}/done");

    let created = client.new_order(order).await.unwrap();
    assert_eq!(created.order_id, PROVIDER_ORDER_ID);
    assert_eq!(created.ext_order_id.as_deref(), Some("pay-1"));
    assert!(created.redirect_uri.unwrap().contains(PROVIDER_ORDER_ID));
    assert!(created.status.is_success());
}

#[tokio::test]
async fn test_new_order_with_products_and_extras() {
    let server = start_provider().await;
    Mock::given(method("POST"))
        .and(path("/api/v2_1/orders"))
        .and(body_partial_json(json!({
            "customerIp": "10.0.0.7",
            "totalAmount": "2500",
            "validityTime": 3600,
            "buyer": {"email": "buyer@example.com", "language": "pl"},
            "products": [{"name": "Book", "unitPrice": "1250", "quantity": 2}],
            "settings": {"invoiceDisabled": "true"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": success(),
            "orderId": PROVIDER_ORDER_ID
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = NewOrder::new("pay-2", dec!(25.00), Currency::PLN)
        .customer_ip("10.0.0.7")
        .validity_time(3600)
        .buyer(Buyer {
            email: "buyer@example.com".to_string(),
            language: Some("pl".to_string()),
            ..Buyer::default()
        })
        .product(Product::new("Book", dec!(12.50), 2))
        .extra("settings", json!({"invoiceDisabled": "true"}));

    let created = client_for(&server).new_order(order).await.unwrap();
    assert_eq!(created.order_id, PROVIDER_ORDER_ID);
    assert!(created.redirect_uri.is_none());
}

#[tokio::test]
async fn test_new_order_rejects_sub_cent_amount_before_sending() {
    let server = start_provider().await;
    Mock::given(method("POST"))
        .and(path("/api/v2_1/orders"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let order = NewOrder::new("pay-3", dec!(10.005), Currency::EUR);
    assert!(matches!(
        client_for(&server).new_order(order).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_gateway_error_carries_status_and_body() {
    let server = start_provider().await;
    Mock::given(method("POST"))
        .and(path("/api/v2_1/orders"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": {
                "statusCode": "ERROR_VALUE_MISSING",
                "code": "8050",
                "codeLiteral": "MISSING_REFUND_SECTION",
                "statusDesc": "Missing required field"
            }
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .new_order(NewOrder::new("pay-4", dec!(1.00), Currency::PLN))
        .await;

    match result {
        Err(AppError::Gateway { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("ERROR_VALUE_MISSING"));
        }
        other => panic!("expected gateway error, got {:?}", other.map(|c| c.order_id)),
    }
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = start_provider().await;
    Mock::given(method("GET"))
        .and(path(order_path(PROVIDER_ORDER_ID)))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).get_order_info(PROVIDER_ORDER_ID).await;
    assert!(matches!(result, Err(AppError::Gateway { status: 503, .. })));
}

#[tokio::test]
async fn test_unauthorized_triggers_single_reauthentication() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_grant(ACCESS_TOKEN, 43199))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(order_path(PROVIDER_ORDER_ID)))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(order_path(PROVIDER_ORDER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orders": [],
            "status": success()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let info = client_for(&server).get_order_info(PROVIDER_ORDER_ID).await.unwrap();
    assert!(info.first_order().is_none());
}

#[tokio::test]
async fn test_repeated_unauthorized_is_surfaced() {
    let server = start_provider().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/captures", order_path(PROVIDER_ORDER_ID))))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let result = client_for(&server).capture(PROVIDER_ORDER_ID).await;
    assert!(matches!(result, Err(AppError::Gateway { status: 401, .. })));
}

#[tokio::test]
async fn test_order_info_is_normalized() {
    let server = start_provider().await;
    Mock::given(method("GET"))
        .and(path(order_path(PROVIDER_ORDER_ID)))
        .and(header("authorization", BEARER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orders": [{
                "orderId": PROVIDER_ORDER_ID,
                "extOrderId": "pay-1",
                "orderCreateDate": "2024-03-02T12:58:14.101+01:00",
                "notifyUrl": "https://shop.example/payments/pay-1/notify",
                "customerIp": "127.0.0.1",
                "merchantPosId": "300746",
                "description": "Payment order",
                "currencyCode": "PLN",
                "totalAmount": "2999",
                "status": "WAITING_FOR_CONFIRMATION",
                "products": [{"name": "Total order", "unitPrice": "2999", "quantity": "1"}]
            }],
            "status": {"statusCode": "SUCCESS", "statusDesc": "Request processing successful"}
        })))
        .mount(&server)
        .await;

    let info = client_for(&server).get_order_info(PROVIDER_ORDER_ID).await.unwrap();
    let order = info.first_order().unwrap();
    assert_eq!(order.total_amount, dec!(29.99));
    assert_eq!(order.status, OrderStatus::WaitingForConfirmation);
    assert_eq!(order.products[0].unit_price, dec!(29.99));
}

#[tokio::test]
async fn test_cancel_and_capture() {
    let server = start_provider().await;
    Mock::given(method("DELETE"))
        .and(path(order_path(PROVIDER_ORDER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orderId": PROVIDER_ORDER_ID,
            "extOrderId": "pay-1",
            "status": success()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{}/captures", order_path(PROVIDER_ORDER_ID))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"statusCode": "SUCCESS", "statusDesc": "Status was updated"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cancelled = client.cancel_order(PROVIDER_ORDER_ID).await.unwrap();
    assert_eq!(cancelled.order_id, PROVIDER_ORDER_ID);
    assert!(client.capture(PROVIDER_ORDER_ID).await.unwrap().status.is_success());
}

#[tokio::test]
async fn test_partial_refund_body() {
    let server = start_provider().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/refunds", order_path(PROVIDER_ORDER_ID))))
        .and(body_json(json!({"refund": {"description": "Refund", "amount": "1000"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orderId": PROVIDER_ORDER_ID,
            "refund": {
                "refundId": "5000009987",
                "extRefundId": "20200702091903",
                "amount": "1000",
                "currencyCode": "PLN",
                "description": "Refund",
                "creationDateTime": "2020-07-02T09:19:03.896+02:00",
                "status": "PENDING",
                "statusDateTime": "2020-07-02T09:19:04.013+02:00"
            },
            "status": {"statusCode": "SUCCESS", "statusDesc": "Refund queued for processing"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .refund(PROVIDER_ORDER_ID, &RefundRequest::partial(dec!(10.00)))
        .await
        .unwrap();

    assert_eq!(created.refund.refund_id, "5000009987");
    assert_eq!(created.refund.amount, dec!(10.00));
    assert_eq!(created.refund.status, RefundStatus::Pending);
    assert!(created.refund.creation_date_time.is_some());
}

#[tokio::test]
async fn test_full_refund_omits_amount() {
    let server = start_provider().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/refunds", order_path(PROVIDER_ORDER_ID))))
        .and(body_json(json!({"refund": {"description": "Customer request"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orderId": PROVIDER_ORDER_ID,
            "refund": {
                "refundId": "5000009988",
                "amount": "2999",
                "currencyCode": "PLN",
                "status": "PENDING"
            },
            "status": success()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .refund(
            PROVIDER_ORDER_ID,
            &RefundRequest::full().description("Customer request"),
        )
        .await
        .unwrap();
    assert_eq!(created.refund.amount, dec!(29.99));
}

#[tokio::test]
async fn test_refund_queries() {
    let server = start_provider().await;
    let refund = json!({
        "refundId": "5000000142",
        "extRefundId": "postman_refund_1",
        "amount": "400",
        "currencyCode": "PLN",
        "description": "Refund",
        "creationDateTime": "2020-07-02T09:19:03.896+02:00",
        "status": "FINALIZED",
        "statusDateTime": "2020-07-02T09:20:00.013+02:00"
    });
    Mock::given(method("GET"))
        .and(path(format!("{}/refunds", order_path(PROVIDER_ORDER_ID))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"refunds": [refund.clone()]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/refunds/5000000142", order_path(PROVIDER_ORDER_ID))))
        .respond_with(ResponseTemplate::new(200).set_body_json(refund))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let list = client.get_refunds(PROVIDER_ORDER_ID).await.unwrap();
    assert_eq!(list.refunds.len(), 1);
    assert_eq!(list.refunds[0].amount, dec!(4.00));

    let single = client.get_refund(PROVIDER_ORDER_ID, "5000000142").await.unwrap();
    assert_eq!(single.status, RefundStatus::Finalized);
}

#[tokio::test]
async fn test_payment_methods_with_language() {
    let server = start_provider().await;
    Mock::given(method("GET"))
        .and(path("/api/v2_1/paymethods"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cardTokens": [],
            "pexTokens": [],
            "payByLinks": [
                {"value": "m", "name": "mTransfer", "status": "ENABLED", "minAmount": 50, "maxAmount": 99999999},
                {"value": "o", "name": "Pekao24", "status": "DISABLED", "minAmount": 50, "maxAmount": 99999999}
            ],
            "status": success()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let methods = client_for(&server).get_payment_methods(Some("en")).await.unwrap();
    assert_eq!(methods.pay_by_links.len(), 2);
    assert_eq!(methods.enabled_pay_by_links().count(), 1);
}

#[tokio::test]
async fn test_transactions_and_shop_info() {
    let server = start_provider().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/transactions", order_path(PROVIDER_ORDER_ID))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transactions": [{"payMethod": {"value": "c"}, "paymentFlow": "CARD"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2_1/shops/SHOP1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shopId": "SHOP1234",
            "name": "Shop Online",
            "currencyCode": "PLN",
            "balance": {"currencyCode": "PLN", "total": "1014000", "available": "1000000"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let transactions = client.get_transactions(PROVIDER_ORDER_ID).await.unwrap();
    assert_eq!(transactions.transactions.len(), 1);

    let shop = client.get_shop_info("SHOP1234").await.unwrap();
    assert_eq!(shop.balance.total, dec!(10140.00));
    assert_eq!(shop.balance.available, dec!(10000.00));
}

#[tokio::test]
async fn test_payouts() {
    let server = start_provider().await;
    Mock::given(method("POST"))
        .and(path("/api/v2_1/payouts"))
        .and(body_json(json!({
            "shopId": "SHOP1234",
            "payout": {"amount": "5000", "description": "Weekly payout"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "payout": {"payoutId": "7d1b8a0f1d2c4e", "status": "PENDING"},
            "status": success()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2_1/payouts/7d1b8a0f1d2c4e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "payout": {"payoutId": "7d1b8a0f1d2c4e", "status": "REALIZED"},
            "status": success()
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = PayoutRequest::new("SHOP1234")
        .amount(dec!(50.00))
        .description("Weekly payout");
    let created = client.create_payout(&request).await.unwrap();
    assert_eq!(created.payout.payout_id, "7d1b8a0f1d2c4e");

    let fetched = client.get_payout("7d1b8a0f1d2c4e").await.unwrap();
    assert_eq!(fetched.payout.status, "REALIZED");
}

#[tokio::test]
async fn test_delete_token_accepts_no_content() {
    let server = start_provider().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2_1/tokens/TOKC_KPNZVSLJW2FHRLNJOKIV7YFJCYA"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_token("TOKC_KPNZVSLJW2FHRLNJOKIV7YFJCYA")
        .await
        .unwrap();
}
