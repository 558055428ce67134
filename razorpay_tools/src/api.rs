use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use rpg_common::Paise;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config::RazorpayApiConfig,
    data_objects::{NewOrderRequest, RazorpayOrder},
    error::RazorpayApiError,
};

/// A thin client for the Razorpay REST API. Only the order-creation call is wrapped; everything else the payment flow
/// needs arrives via webhooks or the checkout callback.
#[derive(Clone)]
pub struct RazorpayApi {
    config: RazorpayApiConfig,
    client: Arc<Client>,
}

impl RazorpayApi {
    pub fn new(config: RazorpayApiConfig) -> Result<Self, RazorpayApiError> {
        if !config.is_configured() {
            return Err(RazorpayApiError::NotConfigured);
        }
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| RazorpayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Creates a payment order with the gateway.
    ///
    /// `amount` is in minor units (paise) and must be positive. `receipt` should be unique per attempt; retries after
    /// a failed payment create a fresh order with a fresh receipt. The returned order id is gateway-issued and is the
    /// idempotency key for all subsequent reconciliation.
    pub async fn create_order(
        &self,
        amount: Paise,
        currency: &str,
        receipt: &str,
        notes: Option<Value>,
    ) -> Result<RazorpayOrder, RazorpayApiError> {
        if !amount.is_positive() {
            return Err(RazorpayApiError::InvalidAmount(format!("{amount} is not a positive amount")));
        }
        let body = NewOrderRequest {
            amount,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
            notes: notes.unwrap_or_else(|| Value::Object(Default::default())),
        };
        debug!("💳️ Creating order for {amount} ({currency}), receipt {receipt}");
        let order: RazorpayOrder = self.rest_query(Method::POST, "/v1/orders", Some(body)).await?;
        info!("💳️ Order {} created for {}", order.id, order.amount);
        Ok(order)
    }

    async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, RazorpayApiError> {
        let url = format!("{}{path}", self.config.api_url);
        trace!("💳️ Sending REST query: {url}");
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.reveal()));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| RazorpayApiError::ResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("💳️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| RazorpayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let raw = response.text().await.map_err(|e| RazorpayApiError::ResponseError(e.to_string()))?;
            let message = extract_gateway_message(&raw);
            Err(RazorpayApiError::GatewayError { status, message })
        }
    }
}

/// Pulls the human-readable `error.description` out of a gateway error body, falling back to the raw body.
fn extract_gateway_message(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| v["error"]["description"].as_str().map(String::from))
        .unwrap_or_else(|| raw.to_string())
}
