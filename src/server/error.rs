use axum::{
    http::StatusCode,
    response::{
        IntoResponse,
        Response,
    },
    Json,
};
use thiserror::Error;
use tracing::{
    error,
    warn,
};

use crate::core::{
    ErrorBody,
    FlashcardError,
};

const TRANSPORT_FAILURE: &str = "Failed to reach Notion";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing Notion credentials")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] FlashcardError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized | ApiError::Upstream(FlashcardError::Unauthorized) => {
                (StatusCode::UNAUTHORIZED, "Missing Notion credentials".to_string())
            }
            ApiError::BadRequest(message) => {
                warn!("Rejected request body: {message}");
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::Upstream(FlashcardError::Notion { status, message }) => {
                warn!("Notion rejected request ({status}): {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ApiError::Upstream(FlashcardError::Reqwest(e)) => {
                error!("Notion transport failure: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, TRANSPORT_FAILURE.to_string())
            }
            ApiError::Upstream(other) => {
                error!("Request failed: {other}");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
