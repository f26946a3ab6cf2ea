use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};

use crate::{
    application::usecases::payment_submissions::PaymentSubmissionUseCase,
    domain::{
        repositories::payment_submissions::PaymentSubmissionRepository,
        value_objects::{
            payment_inputs::PaymentSubmissionInput, payment_validation::CalendarMonth,
        },
    },
    infrastructure::axum_http::error_responses::AppError,
};

pub fn routes<R>(payment_submission_usecase: Arc<PaymentSubmissionUseCase<R>>) -> Router
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(submit::<R>))
        .with_state(payment_submission_usecase)
}

pub async fn submit<R>(
    State(payment_submission_usecase): State<Arc<PaymentSubmissionUseCase<R>>>,
    Json(input): Json<PaymentSubmissionInput>,
) -> Result<impl IntoResponse, AppError>
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    let receipt = payment_submission_usecase
        .submit(input, CalendarMonth::current())
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
