//! Razorpay integration for the registration payment server.
//!
//! This crate wraps the pieces of the Razorpay API that the payment flow needs:
//! * Creating payment orders via the REST API ([`RazorpayApi`]).
//! * Typed data objects for orders and the webhook event envelope ([`data_objects`]).
//! * HMAC-SHA256 signature verification for both the checkout callback and the webhook ([`signature`]).
//!
//! The checkout callback signs the message `"{order_id}|{payment_id}"` with the API key secret, while webhooks sign
//! the raw request body with a separate webhook secret. The two formats share no code path beyond the HMAC primitive.

pub mod data_objects;
pub mod signature;

mod api;
mod config;
mod error;

pub use api::RazorpayApi;
pub use config::RazorpayApiConfig;
pub use data_objects::{RazorpayOrder, WebhookEvent};
pub use error::{RazorpayApiError, SignatureError};
