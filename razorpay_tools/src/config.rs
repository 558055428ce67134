use std::env;

use log::*;
use rpg_common::Secret;

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com";

/// Credentials and endpoint configuration for the Razorpay API.
///
/// Missing credentials do not prevent the server from starting; they leave the config in an unconfigured state which
/// callers must check via [`RazorpayApiConfig::is_configured`] before attempting gateway calls.
#[derive(Clone, Debug)]
pub struct RazorpayApiConfig {
    /// The public key id, e.g. "rzp_live_...". Also used by the storefront to initialise checkout.
    pub key_id: String,
    /// The API key secret. Signs the checkout callback message.
    pub key_secret: Secret<String>,
    /// The webhook signing secret. Configured separately in the Razorpay dashboard.
    pub webhook_secret: Secret<String>,
    pub api_url: String,
}

impl Default for RazorpayApiConfig {
    fn default() -> Self {
        Self {
            key_id: String::default(),
            key_secret: Secret::default(),
            webhook_secret: Secret::default(),
            api_url: DEFAULT_RAZORPAY_API_URL.to_string(),
        }
    }
}

impl RazorpayApiConfig {
    pub fn new_from_env_or_default() -> Self {
        let key_id = env::var("RPS_RAZORPAY_KEY_ID").ok().unwrap_or_else(|| {
            error!("🪛️ RPS_RAZORPAY_KEY_ID is not set. Order creation will be unavailable.");
            String::default()
        });
        let key_secret = env::var("RPS_RAZORPAY_KEY_SECRET").ok().unwrap_or_else(|| {
            error!("🪛️ RPS_RAZORPAY_KEY_SECRET is not set. Order creation and payment verification will be unavailable.");
            String::default()
        });
        let webhook_secret = env::var("RPS_RAZORPAY_WEBHOOK_SECRET").ok().unwrap_or_else(|| {
            error!("🪛️ RPS_RAZORPAY_WEBHOOK_SECRET is not set. Incoming webhooks will be rejected.");
            String::default()
        });
        let api_url = env::var("RPS_RAZORPAY_API_URL").ok().unwrap_or_else(|| DEFAULT_RAZORPAY_API_URL.to_string());
        Self { key_id, key_secret: Secret::new(key_secret), webhook_secret: Secret::new(webhook_secret), api_url }
    }

    /// True when both API credentials are present. Order creation and checkout signature verification require this.
    pub fn is_configured(&self) -> bool {
        !self.key_id.is_empty() && self.key_secret.is_set()
    }

    /// True when the webhook signing secret is present.
    pub fn has_webhook_secret(&self) -> bool {
        self.webhook_secret.is_set()
    }
}
