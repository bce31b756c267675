use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::warn;

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error(transparent)]
    Libwaypoint(#[from] libwaypoint::Error),
    #[error("Resource Not Found: {0}")]
    NotFound(String),
    #[error("Required parameter '{0}' is missing")]
    RequiredParameterMissing(String),
}

impl Error {
    pub(crate) fn to_client_status(&self) -> (StatusCode, String) {
        match self {
            Error::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            Error::Other(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unknown error".to_string(),
            ),
            Error::Libwaypoint(e) => match e {
                libwaypoint::Error::DatabaseRowNotFound(_) => {
                    (StatusCode::NOT_FOUND, "Location not found".to_string())
                }
                libwaypoint::Error::InvalidStateMissingAttribute(_) => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Library error".to_string(),
                ),
            },
            Error::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            Error::RequiredParameterMissing(param) => (
                StatusCode::BAD_REQUEST,
                format!("Missing parameter '{param}'"),
            ),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

// Tell axum how to convert `Error` into a response.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        warn!("Got error for response: {self:?}");
        let (status, message) = self.to_client_status();
        (status, Json(ErrorBody { message })).into_response()
    }
}
