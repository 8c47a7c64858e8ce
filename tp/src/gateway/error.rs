//! Gateway error taxonomy and its HTTP mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use super::request::REQUIRED_FIELDS_MESSAGE;
use crate::domain::SchemaError;
use crate::llm::LlmError;

/// Body sent with every 500; internal detail stays in the logs
pub const SERVER_ERROR_BODY: &str = "Server Error";

/// Errors produced while handling an itinerary request
#[derive(Debug, Error)]
pub enum GatewayError {
    /// One or more required request fields absent or empty
    #[error("{}", REQUIRED_FIELDS_MESSAGE)]
    MissingFields,

    /// Request body was not valid JSON
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Prompt rendering failed: {0}")]
    Prompt(String),

    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Provider output was cut off at the {max_tokens}-token limit")]
    Truncated { max_tokens: u32 },

    #[error("Provider returned malformed JSON: {0}")]
    MalformedItinerary(#[source] serde_json::Error),

    #[error("Provider itinerary failed schema validation: {0}")]
    Schema(#[from] SchemaError),
}

impl GatewayError {
    /// Whether the caller caused this error
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingFields | Self::MalformedBody(_))
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingFields => {
                warn!("Rejected itinerary request: missing fields");
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": REQUIRED_FIELDS_MESSAGE })),
                )
                    .into_response()
            }
            Self::MalformedBody(ref detail) => {
                warn!(%detail, "Rejected itinerary request: malformed body");
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": "Request body must be valid JSON" })),
                )
                    .into_response()
            }
            upstream => {
                error!(error = %upstream, "Itinerary generation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_BODY).into_response()
            }
        }
    }
}
