use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::Utc;
use razorpay_tools::RazorpayApiConfig;
use registration_payment_engine::db_types::{OrderId, PaymentRecord, PaymentStatus, RegistrationStatus, TeamRecord};
use rpg_common::{Rupees, Secret};

// Test credentials. DO NOT re-use these values anywhere.
pub const TEST_KEY_SECRET: &str = "test_key_secret";
pub const TEST_WEBHOOK_SECRET: &str = "test_webhook_secret";

pub fn test_gateway_config() -> RazorpayApiConfig {
    RazorpayApiConfig {
        key_id: "rzp_test_key".to_string(),
        key_secret: Secret::new(TEST_KEY_SECRET.to_string()),
        webhook_secret: Secret::new(TEST_WEBHOOK_SECRET.to_string()),
        ..Default::default()
    }
}

pub async fn send_request(req: TestRequest, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let (_, res) = test::call_service(&service, req.to_request()).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

pub async fn post_json(
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    send_request(TestRequest::post().uri(path).set_json(body), configure).await
}

pub fn sample_payment_record(order_id: &str, team_id: Option<i64>, status: PaymentStatus) -> PaymentRecord {
    PaymentRecord {
        id: 1,
        team_id,
        order_id: OrderId::from(order_id),
        payment_id: Some("pay_123".to_string()),
        amount: Rupees::from(50),
        currency: "INR".to_string(),
        status,
        failure_reason: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_team_record(id: i64) -> TeamRecord {
    TeamRecord {
        id,
        team_name: "Solar Sparks".to_string(),
        school_name: "Shree Janata Secondary School".to_string(),
        school_district: "Kathmandu".to_string(),
        lead_phone: "9800000001".to_string(),
        lead_email: "lead@example.com".to_string(),
        team_code: Some(format!("GEN201-KAT-{id:06}")),
        registration_status: RegistrationStatus::Pending,
        payment_status: PaymentStatus::Completed,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
