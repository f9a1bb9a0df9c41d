use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use order_ftp_engine::RelayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::ForbiddenPeer => StatusCode::FORBIDDEN,
                _ => StatusCode::UNAUTHORIZED,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("The request did not carry an HMAC signature.")]
    MissingHmac,
    #[error("The HMAC signature is invalid.")]
    InvalidHmac,
    #[error("No Shopify API secret is configured, so webhook signatures cannot be checked.")]
    WebhookSecretNotSet,
    #[error("The request did not identify a valid shop. {0}")]
    MissingShopDomain(String),
    #[error("Requests from this address are not allowed.")]
    ForbiddenPeer,
    #[error("No admin token was provided.")]
    MissingAdminToken,
    #[error("The admin token is invalid.")]
    InvalidAdminToken,
    #[error("The admin API is disabled. Set OFR_ADMIN_TOKEN to enable it.")]
    AdminApiDisabled,
}

impl From<RelayError> for ServerError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::SettingsNotFound(shop) => Self::NoRecordFound(format!("No FTP settings saved for {shop}")),
            RelayError::Database(e) => Self::BackendError(e.to_string()),
            RelayError::Format(e) => Self::BackendError(e.to_string()),
            RelayError::Transfer(e) => Self::BackendError(e.to_string()),
        }
    }
}
