use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::payment_submissions::{InsertPaymentSubmissionEntity, PaymentSubmissionEntity},
    repositories::payment_submissions::PaymentSubmissionRepository,
    value_objects::{
        enums::card_brands::CardBrand,
        payment_inputs::PaymentSubmissionInput,
        payment_validation::{CalendarMonth, FieldErrors, ValidatedPayment, validate_payment},
    },
};

#[derive(Debug, Error)]
pub enum PaymentSubmissionError {
    #[error("payment form has invalid fields")]
    Invalid(FieldErrors),
    #[error("failed to store payment submission")]
    Store(#[source] anyhow::Error),
}

impl PaymentSubmissionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PaymentSubmissionError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PaymentSubmissionError::Store(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PaymentSubmissionError>;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub card_type: Option<CardBrand>,
    pub card_last_four: String,
    pub purchase_amount: f64,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentSubmissionEntity> for SubmissionReceipt {
    fn from(entity: PaymentSubmissionEntity) -> Self {
        Self {
            id: entity.id,
            card_type: entity.card_type.as_deref().and_then(CardBrand::from_str),
            card_last_four: entity.card_last_four,
            purchase_amount: entity.purchase_amount,
            created_at: entity.created_at,
        }
    }
}

pub struct PaymentSubmissionUseCase<R>
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    payment_submission_repository: Arc<R>,
}

impl<R> PaymentSubmissionUseCase<R>
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    pub fn new(payment_submission_repository: Arc<R>) -> Self {
        Self {
            payment_submission_repository,
        }
    }

    /// Writes one record for an already validated payment. Exactly one insert is
    /// attempted; failures are logged and returned without retry.
    pub async fn record(
        &self,
        payment: &ValidatedPayment,
        card_brand: Option<CardBrand>,
    ) -> UseCaseResult<SubmissionReceipt> {
        let submission = InsertPaymentSubmissionEntity::from_validated(payment, card_brand);

        info!(
            card_type = ?card_brand,
            purchase_amount = submission.purchase_amount,
            "payment_submissions: storing submission"
        );

        let stored = self
            .payment_submission_repository
            .insert_submission(submission)
            .await
            .map_err(|err| {
                error!(
                    card_type = ?card_brand,
                    db_error = ?err,
                    "payment_submissions: failed to store submission"
                );
                PaymentSubmissionError::Store(err)
            })?;

        info!(
            submission_id = %stored.id,
            "payment_submissions: submission stored"
        );

        Ok(SubmissionReceipt::from(stored))
    }

    /// One-shot path for clients that post the whole form at once: every field is
    /// run through its input mask, validated, and stored.
    pub async fn submit(
        &self,
        input: PaymentSubmissionInput,
        today: CalendarMonth,
    ) -> UseCaseResult<SubmissionReceipt> {
        let formatted = input.formatted();

        let payment = validate_payment(&formatted, today).map_err(|errors| {
            let fields = errors
                .keys()
                .map(|field| field.as_str())
                .collect::<Vec<_>>()
                .join(",");
            let err = PaymentSubmissionError::Invalid(errors);
            warn!(
                fields = %fields,
                status = err.status_code().as_u16(),
                "payment_submissions: submission rejected by validation"
            );
            err
        })?;

        let card_brand = CardBrand::detect(&payment.card_number);
        self.record(&payment, card_brand).await
    }
}
