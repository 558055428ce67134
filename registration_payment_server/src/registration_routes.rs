//! The registration route.
//!
//! Registration is server-authoritative: the checkout signature in the request is verified here, against the key
//! secret this server holds, before anything touches the database. A client cannot register a team as paid by
//! claiming verification happened elsewhere.

use actix_web::{web, HttpResponse};
use log::*;
use razorpay_tools::{signature::verify_checkout_signature, RazorpayApiConfig};
use registration_payment_engine::{
    db_types::{OrderId, VerifiedPayment},
    traits::ReconciliationStore,
    ReconcilerApi,
};

use crate::{
    config::EventConfig,
    data_objects::{RegisterRequest, RegisterResponse},
    errors::ServerError,
};

pub async fn register<B: ReconciliationStore>(
    body: web::Json<RegisterRequest>,
    config: web::Data<RazorpayApiConfig>,
    api: web::Data<ReconcilerApi<B>>,
    event: web::Data<EventConfig>,
) -> Result<HttpResponse, ServerError> {
    let RegisterRequest { registration, payment } = body.into_inner();
    let valid =
        verify_checkout_signature(&payment.order_id, &payment.payment_id, &payment.signature, &config.key_secret)?;
    if !valid {
        warn!(
            "🔐️ Registration for '{}' presented an invalid signature for order {}",
            registration.team.team_name, payment.order_id
        );
        return Err(ServerError::InvalidSignature);
    }
    let verified = VerifiedPayment { order_id: OrderId::from(payment.order_id), payment_id: payment.payment_id };
    let team = api.register_paid_team(registration, verified, event.registration_fee, &event.currency).await?;
    info!("💻️ Team '{}' registered with id {} and code {:?}", team.team_name, team.id, team.team_code);
    let response = RegisterResponse {
        success: true,
        team_id: team.id,
        team_code: team.team_code,
        payment_status: team.payment_status,
    };
    Ok(HttpResponse::Ok().json(response))
}
