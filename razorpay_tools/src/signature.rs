//! HMAC-SHA256 signature verification for Razorpay callbacks.
//!
//! Two distinct message formats are verified here:
//! * The checkout callback signs `"{order_id}|{payment_id}"` with the API key secret.
//! * Webhooks sign the raw request body with the webhook secret.
//!
//! Comparisons scan every byte of both digests rather than short-circuiting on the first mismatch.

use hmac::{Hmac, Mac};
use rpg_common::Secret;
use sha2::Sha256;

use crate::error::SignatureError;

type HmacSha256 = Hmac<Sha256>;

/// Computes `HMAC-SHA256(secret, message)` as a lowercase hex digest.
pub fn hmac_sha256_hex(secret: &str, message: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(message);
    let digest = mac.finalize().into_bytes();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Verifies the signature the gateway hands to the client at the end of checkout.
///
/// The signed message is `"{order_id}|{payment_id}"`, keyed with the API key secret (not the webhook secret).
pub fn verify_checkout_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &Secret<String>,
) -> Result<bool, SignatureError> {
    if !secret.is_set() {
        return Err(SignatureError::SecretNotConfigured);
    }
    if order_id.is_empty() {
        return Err(SignatureError::EmptyInput("order_id"));
    }
    if payment_id.is_empty() {
        return Err(SignatureError::EmptyInput("payment_id"));
    }
    if signature.is_empty() {
        return Err(SignatureError::EmptyInput("signature"));
    }
    let message = format!("{order_id}|{payment_id}");
    let expected = hmac_sha256_hex(secret.reveal(), message.as_bytes());
    Ok(constant_time_eq(expected.as_bytes(), signature.as_bytes()))
}

/// Verifies the `x-razorpay-signature` header of a webhook delivery against the raw request body.
pub fn verify_webhook_signature(body: &[u8], signature: &str, secret: &Secret<String>) -> Result<bool, SignatureError> {
    if !secret.is_set() {
        return Err(SignatureError::SecretNotConfigured);
    }
    if body.is_empty() {
        return Err(SignatureError::EmptyInput("body"));
    }
    if signature.is_empty() {
        return Err(SignatureError::EmptyInput("signature"));
    }
    let expected = hmac_sha256_hex(secret.reveal(), body);
    Ok(constant_time_eq(expected.as_bytes(), signature.as_bytes()))
}

// Accumulates the XOR of every byte pair so that the comparison time does not depend on where a mismatch occurs.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
