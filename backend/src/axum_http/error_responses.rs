use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::usecases::{
    adoptions::AdoptionError, catalog::CatalogError, growth::GrowthError, payments::PaymentError,
    reconciliation::ReconciliationError,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{message}")]
    UseCase { status: StatusCode, message: String },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn from_status(status: StatusCode, message: String) -> Self {
        AppError::UseCase { status, message }
    }
}

macro_rules! usecase_error {
    ($($error:ty),+ $(,)?) => {
        $(
            impl From<$error> for AppError {
                fn from(err: $error) -> Self {
                    AppError::from_status(err.status_code(), err.to_string())
                }
            }
        )+
    };
}

usecase_error!(
    AdoptionError,
    CatalogError,
    GrowthError,
    PaymentError,
    ReconciliationError,
);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            // Don't leak internal error detail to client
            AppError::UseCase { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR => {
                (status, "Internal server error".to_string())
            }
            AppError::UseCase { status, message } => (status, message),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}
