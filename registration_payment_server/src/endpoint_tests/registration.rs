use actix_web::{http::StatusCode, web, web::ServiceConfig};
use razorpay_tools::signature::hmac_sha256_hex;
use registration_payment_engine::{db_types::PaymentStatus, traits::StorageError, ReconcilerApi};

use super::{
    helpers::{post_json, sample_team_record, test_gateway_config, TEST_KEY_SECRET},
    mocks::MockReconciliationDb,
};
use crate::{config::EventConfig, registration_routes::register};

fn register_body(signature: &str) -> serde_json::Value {
    serde_json::json!({
        "team": {
            "team_name": "Solar Sparks",
            "school_name": "Shree Janata Secondary School",
            "school_district": "Kathmandu",
            "lead_phone": "9800000001",
            "lead_email": "lead@example.com"
        },
        "members": [
            {
                "name": "Asha Gurung",
                "gender": "female",
                "grade": "10",
                "phone": "9800000001",
                "email": "asha@example.com",
                "is_team_lead": true
            }
        ],
        "project": { "idea_title": "Solar water purifier" },
        "teacher": {
            "salutation": "Mrs",
            "teacher_name": "Sita Sharma",
            "teacher_phone": "9800000009"
        },
        "payment": {
            "order_id": "order_abc",
            "payment_id": "pay_123",
            "signature": signature
        }
    })
}

fn configure_register_ok(cfg: &mut ServiceConfig) {
    let mut db = MockReconciliationDb::new();
    db.expect_insert_team_with_payment()
        .withf(|registration, payment| {
            let payment_ok = payment.as_ref().is_some_and(|p| {
                p.order_id.as_str() == "order_abc" &&
                    p.payment_id.as_deref() == Some("pay_123") &&
                    p.status == PaymentStatus::Completed
            });
            registration.team.team_name == "Solar Sparks" && payment_ok
        })
        .returning(|_, _| Ok(sample_team_record(7)));
    cfg.app_data(web::Data::new(ReconcilerApi::new(db)))
        .app_data(web::Data::new(test_gateway_config()))
        .app_data(web::Data::new(EventConfig::default()))
        .route("/register", web::post().to(register::<MockReconciliationDb>));
}

fn configure_register_no_db_calls(cfg: &mut ServiceConfig) {
    // Any database call panics the test, which is the point.
    let db = MockReconciliationDb::new();
    cfg.app_data(web::Data::new(ReconcilerApi::new(db)))
        .app_data(web::Data::new(test_gateway_config()))
        .app_data(web::Data::new(EventConfig::default()))
        .route("/register", web::post().to(register::<MockReconciliationDb>));
}

fn configure_register_duplicate(cfg: &mut ServiceConfig) {
    let mut db = MockReconciliationDb::new();
    db.expect_insert_team_with_payment()
        .returning(|_, _| Err(StorageError::DuplicateTeamName("Solar Sparks".to_string())));
    cfg.app_data(web::Data::new(ReconcilerApi::new(db)))
        .app_data(web::Data::new(test_gateway_config()))
        .app_data(web::Data::new(EventConfig::default()))
        .route("/register", web::post().to(register::<MockReconciliationDb>));
}

#[actix_web::test]
async fn register_persists_a_team_with_a_verified_payment() {
    let _ = env_logger::try_init().ok();
    let sig = hmac_sha256_hex(TEST_KEY_SECRET, b"order_abc|pay_123");
    let (status, body) = post_json("/register", register_body(&sig), configure_register_ok).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""success":true"#), "unexpected body: {body}");
    assert!(body.contains("GEN201-KAT-000007"), "unexpected body: {body}");
}

#[actix_web::test]
async fn register_rejects_an_invalid_signature_before_touching_the_database() {
    let _ = env_logger::try_init().ok();
    let sig = hmac_sha256_hex("some_other_secret", b"order_abc|pay_123");
    let (status, body) = post_json("/register", register_body(&sig), configure_register_no_db_calls).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("signature"), "unexpected body: {body}");
}

#[actix_web::test]
async fn register_without_payment_details_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let mut body = register_body("unused");
    body.as_object_mut().unwrap().remove("payment");
    let (status, _) = post_json("/register", body, configure_register_no_db_calls).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn register_reports_duplicate_team_names_as_a_conflict() {
    let _ = env_logger::try_init().ok();
    let sig = hmac_sha256_hex(TEST_KEY_SECRET, b"order_abc|pay_123");
    let (status, body) = post_json("/register", register_body(&sig), configure_register_duplicate).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("already registered"), "unexpected body: {body}");
}
