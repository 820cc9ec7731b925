use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::client::GatewayError;
use crate::domain::ValidationError;

pub const INVALID_REQUEST_BODY: &str = "Invalid request body";
pub const INVALID_NUMBER_FORMAT: &str = "Invalid number format";
pub const FAILED_TO_CREATE_JSON: &str = "Failed to create JSON";
pub const ERROR_CALLING_GATEWAY: &str = "Error calling SMS gateway";
pub const FAILED_TO_SEND_MESSAGE: &str = "Failed to send message";

/// Terminal failure of a `/send-sms` request.
///
/// The caller only ever sees a fixed plain-text message; the detail is logged.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::InvalidRecipientFormat { .. }) => {
                INVALID_NUMBER_FORMAT
            }
            Self::Validation(_) => INVALID_REQUEST_BODY,
            Self::Gateway(GatewayError::Serialization(_)) => FAILED_TO_CREATE_JSON,
            Self::Gateway(GatewayError::Rejected { .. }) => FAILED_TO_SEND_MESSAGE,
            Self::Gateway(GatewayError::Unreachable(_) | GatewayError::Build(_)) => {
                ERROR_CALLING_GATEWAY
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let message = self.public_message();
        match &self {
            Self::Gateway(GatewayError::Rejected { status, body }) => {
                tracing::error!(status, body = %body, "{message}");
            }
            other => {
                tracing::error!(error = %other, "{message}");
            }
        }
        (self.status(), message).into_response()
    }
}
