use rpg_common::Paise;
use serde::{Deserialize, Serialize};
use serde_json::Value;

//--------------------------------------    RazorpayOrder    ----------------------------------------------------------
/// A Razorpay order entity, as returned by `POST /v1/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: Paise,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    /// Gateway-side order status: `created`, `attempted`, or `paid`.
    pub status: String,
    #[serde(default)]
    pub notes: Value,
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// The request body for `POST /v1/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderRequest {
    pub amount: Paise,
    pub currency: String,
    pub receipt: String,
    pub notes: Value,
}

//--------------------------------------    WebhookEvent     ----------------------------------------------------------
/// The webhook event envelope. Razorpay wraps the affected entities in `payload.order.entity` and
/// `payload.payment.entity`; either may be absent depending on the event type, so all the accessors below are
/// best-effort.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub order: Option<WrappedEntity<OrderEntity>>,
    #[serde(default)]
    pub payment: Option<WrappedEntity<PaymentEntity>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WrappedEntity<T> {
    pub entity: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderEntity {
    pub id: String,
    #[serde(default)]
    pub amount: Option<Paise>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEntity {
    pub id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub amount: Option<Paise>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub notes: Value,
}

impl WebhookEvent {
    /// The order id the event pertains to, preferring the order entity over the payment entity.
    pub fn order_id(&self) -> Option<&str> {
        self.payload
            .order
            .as_ref()
            .map(|o| o.entity.id.as_str())
            .or_else(|| self.payload.payment.as_ref().and_then(|p| p.entity.order_id.as_deref()))
    }

    pub fn payment_id(&self) -> Option<&str> {
        self.payload.payment.as_ref().map(|p| p.entity.id.as_str())
    }

    /// The payment amount in minor units, when the event carries a payment entity.
    pub fn amount(&self) -> Option<Paise> {
        self.payload.payment.as_ref().and_then(|p| p.entity.amount)
    }

    pub fn currency(&self) -> Option<&str> {
        self.payload.payment.as_ref().and_then(|p| p.entity.currency.as_deref())
    }

    /// A human-readable failure reason: the gateway's `error_description` when present, else a `failure_reason` note
    /// attached to the payment.
    pub fn failure_reason(&self) -> Option<&str> {
        let payment = self.payload.payment.as_ref()?;
        payment
            .entity
            .error_description
            .as_deref()
            .or_else(|| payment.entity.notes.get("failure_reason").and_then(|v| v.as_str()))
    }
}
