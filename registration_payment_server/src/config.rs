use std::env;

use log::*;
use razorpay_tools::RazorpayApiConfig;
use rpg_common::{Rupees, INR_CURRENCY_CODE};

const DEFAULT_RPS_HOST: &str = "127.0.0.1";
const DEFAULT_RPS_PORT: u16 = 8360;
const DEFAULT_REGISTRATION_FEE: i64 = 50;
const DEFAULT_CURRENCY: &str = INR_CURRENCY_CODE;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Razorpay credentials and endpoint. May be unconfigured, in which case order creation is disabled but the rest
    /// of the server still runs.
    pub razorpay: RazorpayApiConfig,
    /// Event-specific knobs: what teams pay and in which currency.
    pub event: EventConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPS_HOST.to_string(),
            port: DEFAULT_RPS_PORT,
            database_url: String::default(),
            razorpay: RazorpayApiConfig::default(),
            event: EventConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("RPS_HOST").ok().unwrap_or_else(|| DEFAULT_RPS_HOST.into());
        let port = env::var("RPS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for RPS_PORT. {e} Using the default, {DEFAULT_RPS_PORT}, instead."
                    );
                    DEFAULT_RPS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_RPS_PORT);
        let database_url = env::var("RPS_DATABASE_URL").unwrap_or_else(|_| {
            error!("🪛️ RPS_DATABASE_URL is not set. Please set it to the database URL for the server.");
            String::default()
        });
        let razorpay = RazorpayApiConfig::new_from_env_or_default();
        let event = EventConfig::from_env_or_default();
        Self { host, port, database_url, razorpay, event }
    }
}

/// The fee and currency recorded against a verified registration. The server, not the client, is authoritative for
/// what a registration costs.
#[derive(Clone, Debug)]
pub struct EventConfig {
    /// The registration fee, in whole rupees.
    pub registration_fee: Rupees,
    pub currency: String,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self { registration_fee: Rupees::from(DEFAULT_REGISTRATION_FEE), currency: DEFAULT_CURRENCY.to_string() }
    }
}

impl EventConfig {
    pub fn from_env_or_default() -> Self {
        let registration_fee = env::var("RPS_REGISTRATION_FEE")
            .map(|s| {
                s.parse::<i64>().map(Rupees::from).unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid rupee amount for RPS_REGISTRATION_FEE. {e} Using the default, \
                         {DEFAULT_REGISTRATION_FEE}, instead."
                    );
                    Rupees::from(DEFAULT_REGISTRATION_FEE)
                })
            })
            .ok()
            .unwrap_or_else(|| Rupees::from(DEFAULT_REGISTRATION_FEE));
        let currency = env::var("RPS_CURRENCY").ok().unwrap_or_else(|| DEFAULT_CURRENCY.into());
        Self { registration_fee, currency }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_event_config_charges_fifty_rupees_in_inr() {
        let event = EventConfig::default();
        assert_eq!(event.registration_fee, Rupees::from(50));
        assert_eq!(event.currency, "INR");
    }
}
