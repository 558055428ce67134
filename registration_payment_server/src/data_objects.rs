use registration_payment_engine::db_types::{NewRegistration, PaymentStatus};
use rpg_common::Paise;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The order-creation request. All fields are extracted as options so that missing ones can be reported as a
/// validation error rather than a generic deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: Option<Paise>,
    pub currency: Option<String>,
    pub receipt: Option<String>,
    #[serde(default)]
    pub notes: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub id: String,
    pub amount: Paise,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
}

/// The triplet Razorpay hands the client when checkout completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutPayment {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(flatten)]
    pub registration: NewRegistration,
    pub payment: CheckoutPayment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub team_id: i64,
    pub team_code: Option<String>,
    pub payment_status: PaymentStatus,
}

/// Webhook deliveries are acknowledged with this body whether or not they changed anything, so the gateway does not
/// retry events we have deliberately dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}
