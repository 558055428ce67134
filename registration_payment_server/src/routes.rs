//! Payment route handlers.
//!
//! The handlers are generic over the storage backend so that the endpoint tests can run them against a mock store.

use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use razorpay_tools::{
    data_objects::WebhookEvent,
    signature::{verify_checkout_signature, verify_webhook_signature},
    RazorpayApi,
    RazorpayApiConfig,
};
use registration_payment_engine::{
    db_types::OrderId,
    traits::ReconciliationStore,
    PaymentEvent,
    PaymentEventKind,
    ReconcilerApi,
};

use crate::{
    data_objects::{CheckoutPayment, CreateOrderRequest, CreateOrderResponse, VerifyResponse, WebhookAck},
    errors::ServerError,
};

pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-razorpay-signature";

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Create order  ----------------------------------------------
/// Creates a gateway order and records it as a pending payment.
///
/// The pending record is what lets the webhook path recognise the order later; an order the server cannot record is
/// an order it refuses to create.
pub async fn create_order<B: ReconciliationStore>(
    body: web::Json<CreateOrderRequest>,
    gateway: web::Data<Option<RazorpayApi>>,
    api: web::Data<ReconcilerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let (Some(amount), Some(currency), Some(receipt)) = (req.amount, req.currency, req.receipt) else {
        return Err(ServerError::MissingFields("amount, currency and receipt are required".to_string()));
    };
    if !amount.is_positive() {
        return Err(ServerError::MissingFields(format!("{amount} is not a valid order amount")));
    }
    let Some(gateway) = gateway.get_ref() else {
        warn!("💻️ Order requested but the payment gateway is not configured");
        return Err(ServerError::PaymentGatewayNotConfigured);
    };
    let order = gateway.create_order(amount, &currency, &receipt, req.notes).await?;
    api.record_new_order(OrderId::from(order.id.clone()), order.amount.to_rupees(), &order.currency).await?;
    info!("💻️ Order {} created for {} (receipt {receipt})", order.id, order.amount);
    let response = CreateOrderResponse {
        id: order.id,
        amount: order.amount,
        currency: order.currency,
        receipt: order.receipt,
        status: order.status,
    };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Verify  ----------------------------------------------------
/// Verifies a checkout callback signature for the client.
///
/// This endpoint is advisory only; nothing is persisted here. The registration endpoint re-verifies the signature
/// itself before writing anything, so a client that skips this call gains nothing.
pub async fn verify_payment(
    body: web::Json<CheckoutPayment>,
    config: web::Data<RazorpayApiConfig>,
) -> Result<HttpResponse, ServerError> {
    let payment = body.into_inner();
    let valid =
        verify_checkout_signature(&payment.order_id, &payment.payment_id, &payment.signature, &config.key_secret)?;
    if valid {
        debug!("🔐️ Checkout signature for order {} verified", payment.order_id);
        let response = VerifyResponse {
            verified: true,
            message: Some("Payment verified successfully".to_string()),
            error: None,
        };
        Ok(HttpResponse::Ok().json(response))
    } else {
        info!("🔐️ Invalid checkout signature presented for order {}", payment.order_id);
        let response = VerifyResponse {
            verified: false,
            message: None,
            error: Some("Payment signature verification failed".to_string()),
        };
        Ok(HttpResponse::BadRequest().json(response))
    }
}

//----------------------------------------------   Webhook  ----------------------------------------------------
/// Receives payment events from the gateway.
///
/// The signature covers the raw body bytes, so the body must be taken as [`web::Bytes`] and parsed only after
/// verification. Authenticated deliveries are acknowledged with `{"received": true}` even when dropped, so the
/// gateway does not keep retrying them; an unknown order id gets the same acknowledgment as a settled one, leaving
/// no oracle for forged order ids.
pub async fn webhook<B: ReconciliationStore>(
    req: HttpRequest,
    body: web::Bytes,
    config: web::Data<RazorpayApiConfig>,
    api: web::Data<ReconcilerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let signature = req
        .headers()
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ServerError::MissingFields(WEBHOOK_SIGNATURE_HEADER.to_string()))?;
    let valid = verify_webhook_signature(&body, signature, &config.webhook_secret)?;
    if !valid {
        warn!("🔐️ Webhook delivery with an invalid signature was rejected");
        return Err(ServerError::InvalidSignature);
    }
    let event: WebhookEvent = serde_json::from_slice(&body).map_err(|e| {
        debug!("💻️ Could not parse webhook body. {e}");
        ServerError::CouldNotDeserializePayload
    })?;
    let kind = PaymentEventKind::from_event_name(&event.event);
    if kind.final_status().is_none() {
        debug!("💻️ Webhook event '{}' is not reconciled. Acknowledged and dropped.", event.event);
        return Ok(HttpResponse::Ok().json(WebhookAck { received: true }));
    }
    let order_id = event
        .order_id()
        .ok_or_else(|| ServerError::InvalidRequestBody(format!("event '{}' carries no order id", event.event)))?;
    let payment_event = PaymentEvent {
        kind,
        order_id: OrderId::from(order_id),
        payment_id: event.payment_id().map(String::from),
        amount: event.amount(),
        currency: event.currency().map(String::from),
        failure_reason: event.failure_reason().map(String::from),
    };
    let outcome = api.process_webhook_event(payment_event).await?;
    trace!("💻️ Webhook event '{}' processed: {outcome:?}", event.event);
    Ok(HttpResponse::Ok().json(WebhookAck { received: true }))
}
