use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    application::usecases::{
        payment_forms::PaymentFormError, payment_submissions::PaymentSubmissionError,
    },
    domain::value_objects::{notifications::PAYMENT_FAILED_MESSAGE, payment_validation::FieldErrors},
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Payment form has invalid fields")]
    Unprocessable(FieldErrors),

    #[error("{}", PAYMENT_FAILED_MESSAGE)]
    BadGateway,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<PaymentFormError> for AppError {
    fn from(err: PaymentFormError) -> Self {
        match err.status_code() {
            StatusCode::NOT_FOUND => AppError::NotFound(err.to_string()),
            _ => AppError::Conflict(err.to_string()),
        }
    }
}

impl From<PaymentSubmissionError> for AppError {
    fn from(err: PaymentSubmissionError) -> Self {
        match err {
            PaymentSubmissionError::Invalid(errors) => AppError::Unprocessable(errors),
            // already logged by the use case
            PaymentSubmissionError::Store(_) => AppError::BadGateway,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, errors) = match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, None),
            AppError::Conflict(_) => (StatusCode::CONFLICT, None),
            AppError::Unprocessable(errors) => (StatusCode::UNPROCESSABLE_ENTITY, Some(errors)),
            AppError::BadGateway => (StatusCode::BAD_GATEWAY, None),
            // Don't leak internal error detail to client
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
            errors,
        });

        (status, body).into_response()
    }
}
