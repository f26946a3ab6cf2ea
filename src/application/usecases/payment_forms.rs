use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        form_sessions::FormSessions, usecases::payment_submissions::PaymentSubmissionUseCase,
    },
    domain::{
        entities::payment_forms::{FormTransitionError, SubmitAttempt},
        repositories::payment_submissions::PaymentSubmissionRepository,
        value_objects::{
            enums::form_fields::FormField, payment_forms::PaymentFormView,
            payment_validation::CalendarMonth,
        },
    },
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentFormError {
    #[error("payment form not found")]
    NotFound,
    #[error(transparent)]
    Transition(#[from] FormTransitionError),
}

impl PaymentFormError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PaymentFormError::NotFound => StatusCode::NOT_FOUND,
            PaymentFormError::Transition(_) => StatusCode::CONFLICT,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PaymentFormError>;

/// Held while a store write is in flight. If the submit future is dropped first
/// (request timeout, client gone) the form is settled as a failed submit.
struct InFlightSubmit {
    sessions: Arc<FormSessions>,
    id: Uuid,
    settled: bool,
}

impl InFlightSubmit {
    fn new(sessions: &Arc<FormSessions>, id: Uuid) -> Self {
        Self {
            sessions: Arc::clone(sessions),
            id,
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for InFlightSubmit {
    fn drop(&mut self) {
        if !self.settled {
            self.sessions.abandon_submit(self.id);
        }
    }
}

/// Drives server-held payment forms: one session per open form on a page.
pub struct PaymentFormUseCase<R>
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    sessions: Arc<FormSessions>,
    payment_submission_usecase: Arc<PaymentSubmissionUseCase<R>>,
}

impl<R> PaymentFormUseCase<R>
where
    R: PaymentSubmissionRepository + Send + Sync + 'static,
{
    pub fn new(
        sessions: Arc<FormSessions>,
        payment_submission_usecase: Arc<PaymentSubmissionUseCase<R>>,
    ) -> Self {
        Self {
            sessions,
            payment_submission_usecase,
        }
    }

    pub async fn open(&self) -> UseCaseResult<PaymentFormView> {
        let id = self.sessions.open().await;
        let open_forms = self.sessions.len().await;
        info!(form_id = %id, open_forms, "payment_forms: form opened");
        self.view(id).await
    }

    pub async fn view(&self, id: Uuid) -> UseCaseResult<PaymentFormView> {
        self.sessions
            .with_form(id, |form| form.snapshot(id))
            .await
            .ok_or(PaymentFormError::NotFound)
    }

    pub async fn update_field(
        &self,
        id: Uuid,
        field: FormField,
        value: String,
        today: CalendarMonth,
    ) -> UseCaseResult<PaymentFormView> {
        let view = self
            .sessions
            .with_form(id, |form| {
                form.update_field(field, &value, today)?;
                Ok::<_, FormTransitionError>(form.snapshot(id))
            })
            .await
            .ok_or(PaymentFormError::NotFound)??;

        debug!(
            form_id = %id,
            field = %field,
            valid = !view.errors.contains_key(&field),
            card_type = ?view.card_brand,
            "payment_forms: field updated"
        );

        Ok(view)
    }

    /// Validates the whole form and, when it passes, performs the single store
    /// write. The session lock is released while the write is in flight; the form
    /// sits in `Submitting` so a second submit is refused.
    pub async fn submit(&self, id: Uuid, today: CalendarMonth) -> UseCaseResult<PaymentFormView> {
        let attempt = self
            .sessions
            .with_form(id, |form| form.begin_submit(today))
            .await
            .ok_or(PaymentFormError::NotFound)?
            .map_err(|err| {
                let err = PaymentFormError::from(err);
                warn!(
                    form_id = %id,
                    error = %err,
                    status = err.status_code().as_u16(),
                    "payment_forms: submit refused"
                );
                err
            })?;

        let (payment, card_brand) = match attempt {
            SubmitAttempt::Ready {
                payment,
                card_brand,
            } => (payment, card_brand),
            SubmitAttempt::Blocked => {
                info!(form_id = %id, "payment_forms: submit blocked by invalid fields");
                return self.view(id).await;
            }
        };

        let in_flight = InFlightSubmit::new(&self.sessions, id);

        let outcome = self
            .payment_submission_usecase
            .record(&payment, card_brand)
            .await;

        let view = self
            .sessions
            .with_form(id, |form| {
                match &outcome {
                    Ok(_) => form.mark_submitted()?,
                    Err(_) => form.mark_failed()?,
                }
                Ok::<_, FormTransitionError>(form.snapshot(id))
            })
            .await
            .ok_or_else(|| {
                warn!(form_id = %id, "payment_forms: form closed while submitting");
                PaymentFormError::NotFound
            });
        in_flight.settle();
        let view = view??;

        match outcome {
            Ok(receipt) => info!(
                form_id = %id,
                submission_id = %receipt.id,
                "payment_forms: form submitted"
            ),
            Err(err) => warn!(
                form_id = %id,
                error = %err,
                "payment_forms: submission failed, form kept for retry"
            ),
        }

        Ok(view)
    }

    pub async fn reset(&self, id: Uuid) -> UseCaseResult<PaymentFormView> {
        let view = self
            .sessions
            .with_form(id, |form| {
                form.reset()?;
                Ok::<_, FormTransitionError>(form.snapshot(id))
            })
            .await
            .ok_or(PaymentFormError::NotFound)??;

        info!(form_id = %id, "payment_forms: form reset");
        Ok(view)
    }

    pub async fn close(&self, id: Uuid) -> UseCaseResult<()> {
        if !self.sessions.close(id).await {
            return Err(PaymentFormError::NotFound);
        }
        info!(form_id = %id, "payment_forms: form closed");
        Ok(())
    }
}
