use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use razorpay_tools::{RazorpayApiError, SignatureError};
use registration_payment_engine::{traits::StorageError, ReconcilerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Payload deserialization error")]
    CouldNotDeserializePayload,
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Missing required fields: {0}")]
    MissingFields(String),
    #[error("Payment signature verification failed")]
    InvalidSignature,
    #[error("The payment gateway is not configured on this server")]
    PaymentGatewayNotConfigured,
    #[error("The payment gateway rejected the request. {0}")]
    GatewayError(String),
    #[error("A team with this name is already registered: {0}")]
    DuplicateTeam(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CouldNotDeserializePayload => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::MissingFields(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSignature => StatusCode::BAD_REQUEST,
            Self::PaymentGatewayNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::DuplicateTeam(_) => StatusCode::CONFLICT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::GatewayError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<ReconcilerError> for ServerError {
    fn from(e: ReconcilerError) -> Self {
        match e {
            ReconcilerError::StorageError(StorageError::DuplicateTeamName(name)) => Self::DuplicateTeam(name),
            ReconcilerError::StorageError(StorageError::InvalidRegistration(msg)) => Self::MissingFields(msg),
            ReconcilerError::StorageError(StorageError::DatabaseError(msg)) => Self::BackendError(msg),
        }
    }
}

impl From<RazorpayApiError> for ServerError {
    fn from(e: RazorpayApiError) -> Self {
        match e {
            RazorpayApiError::NotConfigured => Self::PaymentGatewayNotConfigured,
            RazorpayApiError::InvalidAmount(msg) => Self::ConfigurationError(msg),
            RazorpayApiError::Initialization(msg) => Self::InitializeError(msg),
            RazorpayApiError::GatewayError { status, message } => {
                Self::GatewayError(format!("Gateway returned {status}: {message}"))
            },
            RazorpayApiError::ResponseError(msg) | RazorpayApiError::JsonError(msg) => Self::GatewayError(msg),
        }
    }
}

impl From<SignatureError> for ServerError {
    fn from(e: SignatureError) -> Self {
        match e {
            SignatureError::EmptyInput(field) => Self::MissingFields(field.to_string()),
            SignatureError::SecretNotConfigured => {
                Self::ConfigurationError("Signature secret is not configured".to_string())
            },
        }
    }
}
