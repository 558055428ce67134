//! # Registration payment server
//! This module hosts the server code for the registration payment gateway. It is responsible for:
//! Creating payment orders with Razorpay on behalf of registering teams.
//! Verifying checkout signatures and webhook deliveries from the gateway.
//! Reconciling payment outcomes into the registration database.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/payment/create-order`: Creates a payment order with the gateway.
//! * `/payment/verify`: Verifies a checkout callback signature.
//! * `/payment/webhook`: The webhook route for receiving payment events from Razorpay.
//! * `/register`: Persists a registration after verifying its payment server-side.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod registration_routes;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
