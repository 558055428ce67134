use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use razorpay_tools::{signature::hmac_sha256_hex, RazorpayApi, RazorpayApiConfig};
use registration_payment_engine::{db_types::PaymentStatus, ReconcilerApi};

use super::{
    helpers::{
        post_json,
        sample_payment_record,
        send_request,
        test_gateway_config,
        TEST_KEY_SECRET,
        TEST_WEBHOOK_SECRET,
    },
    mocks::MockReconciliationDb,
};
use crate::routes::{create_order, health, verify_payment, webhook, WEBHOOK_SIGNATURE_HEADER};

//----------------------------------------------   Health  ----------------------------------------------------

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(TestRequest::get().uri("/health"), |cfg| {
        cfg.service(health);
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

//----------------------------------------------   Create order  ----------------------------------------------

fn configure_create_order_without_gateway(cfg: &mut ServiceConfig) {
    let db = MockReconciliationDb::new();
    cfg.app_data(web::Data::new(ReconcilerApi::new(db)))
        .app_data(web::Data::new(None::<RazorpayApi>))
        .route("/payment/create-order", web::post().to(create_order::<MockReconciliationDb>));
}

#[actix_web::test]
async fn create_order_without_gateway_is_unavailable() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "amount": 5000, "currency": "INR", "receipt": "r1" });
    let (status, body) = post_json("/payment/create-order", body, configure_create_order_without_gateway).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("not configured"), "unexpected body: {body}");
}

#[actix_web::test]
async fn create_order_rejects_missing_fields_before_any_gateway_call() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "currency": "INR", "receipt": "r1" });
    let (status, body) = post_json("/payment/create-order", body, configure_create_order_without_gateway).await;
    // 400, not 503: validation runs before the gateway is even considered.
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("required"), "unexpected body: {body}");
}

#[actix_web::test]
async fn create_order_rejects_a_non_positive_amount() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "amount": 0, "currency": "INR", "receipt": "r1" });
    let (status, body) = post_json("/payment/create-order", body, configure_create_order_without_gateway).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("amount"), "unexpected body: {body}");
}

//----------------------------------------------   Verify  ----------------------------------------------------

fn configure_verify(cfg: &mut ServiceConfig) {
    cfg.app_data(web::Data::new(test_gateway_config())).route("/payment/verify", web::post().to(verify_payment));
}

fn configure_verify_unconfigured(cfg: &mut ServiceConfig) {
    cfg.app_data(web::Data::new(RazorpayApiConfig::default()))
        .route("/payment/verify", web::post().to(verify_payment));
}

fn checkout_body(signature: &str) -> serde_json::Value {
    serde_json::json!({
        "order_id": "order_abc",
        "payment_id": "pay_123",
        "signature": signature,
    })
}

#[actix_web::test]
async fn verify_accepts_a_valid_signature() {
    let _ = env_logger::try_init().ok();
    let sig = hmac_sha256_hex(TEST_KEY_SECRET, b"order_abc|pay_123");
    let (status, body) = post_json("/payment/verify", checkout_body(&sig), configure_verify).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""verified":true"#), "unexpected body: {body}");
}

#[actix_web::test]
async fn verify_rejects_a_tampered_signature() {
    let _ = env_logger::try_init().ok();
    let sig = hmac_sha256_hex(TEST_KEY_SECRET, b"order_abc|pay_999");
    let (status, body) = post_json("/payment/verify", checkout_body(&sig), configure_verify).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains(r#""verified":false"#), "unexpected body: {body}");
}

#[actix_web::test]
async fn verify_rejects_missing_fields() {
    let _ = env_logger::try_init().ok();
    let sig = hmac_sha256_hex(TEST_KEY_SECRET, b"order_abc|pay_123");
    let body = serde_json::json!({ "order_id": "", "payment_id": "pay_123", "signature": sig });
    let (status, _) = post_json("/payment/verify", body, configure_verify).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn verify_without_a_key_secret_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    // A missing secret is a configuration fault, never reported as "invalid signature".
    let sig = hmac_sha256_hex(TEST_KEY_SECRET, b"order_abc|pay_123");
    let (status, body) = post_json("/payment/verify", checkout_body(&sig), configure_verify_unconfigured).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("verified"), "unexpected body: {body}");
}

//----------------------------------------------   Webhook  ----------------------------------------------------

const CAPTURED_BODY: &str = r#"{
    "event": "payment.captured",
    "payload": {
        "payment": {
            "entity": {
                "id": "pay_123",
                "order_id": "order_abc",
                "amount": 5000,
                "currency": "INR",
                "status": "captured"
            }
        }
    }
}"#;

fn signed_webhook_request(body: &'static str) -> TestRequest {
    let sig = hmac_sha256_hex(TEST_WEBHOOK_SECRET, body.as_bytes());
    TestRequest::post()
        .uri("/payment/webhook")
        .insert_header((WEBHOOK_SIGNATURE_HEADER, sig))
        .set_payload(body)
}

fn configure_webhook_captured(cfg: &mut ServiceConfig) {
    let mut db = MockReconciliationDb::new();
    db.expect_update_payment_by_order_id()
        .withf(|update| update.order_id.as_str() == "order_abc" && update.status == PaymentStatus::Completed)
        .returning(|_| Ok(Some(sample_payment_record("order_abc", Some(7), PaymentStatus::Completed))));
    db.expect_mark_team_paid().withf(|&team_id| team_id == 7).returning(|_| Ok(true));
    cfg.app_data(web::Data::new(ReconcilerApi::new(db)))
        .app_data(web::Data::new(test_gateway_config()))
        .route("/payment/webhook", web::post().to(webhook::<MockReconciliationDb>));
}

fn configure_webhook_no_db_calls(cfg: &mut ServiceConfig) {
    // Any database call panics the test, which is the point.
    let db = MockReconciliationDb::new();
    cfg.app_data(web::Data::new(ReconcilerApi::new(db)))
        .app_data(web::Data::new(test_gateway_config()))
        .route("/payment/webhook", web::post().to(webhook::<MockReconciliationDb>));
}

fn configure_webhook_unknown_order(cfg: &mut ServiceConfig) {
    let mut db = MockReconciliationDb::new();
    db.expect_update_payment_by_order_id().returning(|_| Ok(None));
    cfg.app_data(web::Data::new(ReconcilerApi::new(db)))
        .app_data(web::Data::new(test_gateway_config()))
        .route("/payment/webhook", web::post().to(webhook::<MockReconciliationDb>));
}

#[actix_web::test]
async fn webhook_settles_a_captured_payment() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(signed_webhook_request(CAPTURED_BODY), configure_webhook_captured).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"received":true}"#);
}

#[actix_web::test]
async fn webhook_rejects_an_invalid_signature() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/payment/webhook")
        .insert_header((WEBHOOK_SIGNATURE_HEADER, "0".repeat(64)))
        .set_payload(CAPTURED_BODY);
    let (status, body) = send_request(req, configure_webhook_no_db_calls).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("signature"), "unexpected body: {body}");
}

#[actix_web::test]
async fn webhook_requires_the_signature_header() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/payment/webhook").set_payload(CAPTURED_BODY);
    let (status, body) = send_request(req, configure_webhook_no_db_calls).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains(WEBHOOK_SIGNATURE_HEADER), "unexpected body: {body}");
}

#[actix_web::test]
async fn webhook_rejects_a_settlement_event_without_an_order_id() {
    let _ = env_logger::try_init().ok();
    const NO_ORDER_BODY: &str = r#"{
        "event": "payment.captured",
        "payload": { "payment": { "entity": { "id": "pay_123", "amount": 5000 } } }
    }"#;
    let (status, body) = send_request(signed_webhook_request(NO_ORDER_BODY), configure_webhook_no_db_calls).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("order id"), "unexpected body: {body}");
}

#[actix_web::test]
async fn webhook_for_an_unknown_order_is_still_acknowledged() {
    let _ = env_logger::try_init().ok();
    // Same acknowledgment as a settled order, so forged order ids learn nothing.
    let (status, body) = send_request(signed_webhook_request(CAPTURED_BODY), configure_webhook_unknown_order).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"received":true}"#);
}

#[actix_web::test]
async fn webhook_acknowledges_events_it_does_not_reconcile() {
    let _ = env_logger::try_init().ok();
    const AUTHORIZED_BODY: &str = r#"{
        "event": "payment.authorized",
        "payload": {
            "payment": { "entity": { "id": "pay_123", "order_id": "order_abc", "amount": 5000 } }
        }
    }"#;
    let (status, body) = send_request(signed_webhook_request(AUTHORIZED_BODY), configure_webhook_no_db_calls).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"received":true}"#);
}
