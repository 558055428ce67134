use thiserror::Error;

#[derive(Debug, Error)]
pub enum RazorpayApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Razorpay API credentials are not configured")]
    NotConfigured,
    #[error("Invalid order amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid REST response: {0}")]
    ResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Gateway request failed. Error {status}. {message}")]
    GatewayError { status: u16, message: String },
}

#[derive(Debug, Clone, Error)]
pub enum SignatureError {
    #[error("Signature input must not be empty: {0}")]
    EmptyInput(&'static str),
    #[error("The signing secret is not configured")]
    SecretNotConfigured,
}
