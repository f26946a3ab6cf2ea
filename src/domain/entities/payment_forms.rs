use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_objects::{
    enums::{card_brands::CardBrand, form_fields::FormField, form_states::FormState},
    notifications::{Notification, PAYMENT_FAILED_MESSAGE},
    payment_forms::PaymentFormView,
    payment_inputs::PaymentSubmissionInput,
    payment_validation::{
        CalendarMonth, FieldErrors, ValidatedPayment, validate_field, validate_payment,
    },
};

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FormTransitionError {
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("the form has already been submitted")]
    AlreadySubmitted,
    #[error("no submission is in flight")]
    NotSubmitting,
    #[error("the form can only be reset after a successful submission")]
    NotSubmitted,
}

/// Result of asking the form to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// Every field passed; the form is now `Submitting` and the caller owns the write.
    Ready {
        payment: ValidatedPayment,
        card_brand: Option<CardBrand>,
    },
    /// At least one field failed; errors are recorded and nothing should be written.
    Blocked,
}

/// One payment form instance and its submission lifecycle.
///
/// ```text
/// Editing ──submit (valid)──▶ Submitting ──ok──▶ Submitted ──reset──▶ Editing
///                              └──err──▶ EditingWithError ──edit──▶ Editing
/// ```
///
/// Only one submission can be in flight: `begin_submit` refuses while the form is
/// `Submitting`.
#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    values: PaymentSubmissionInput,
    errors: FieldErrors,
    card_brand: Option<CardBrand>,
    state: FormState,
    submit_error: Option<String>,
    notifications: Vec<Notification>,
}

impl PaymentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &PaymentSubmissionInput {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn card_brand(&self) -> Option<CardBrand> {
        self.card_brand
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn can_submit(&self) -> bool {
        self.state.is_editing()
    }

    /// Whether the current values would pass a submit right now.
    pub fn is_valid(&self, today: CalendarMonth) -> bool {
        validate_payment(&self.values, today).is_ok()
    }

    /// Applies one keystroke-level change: formats the value, refreshes the card
    /// brand for card numbers and re-validates that field only.
    pub fn update_field(
        &mut self,
        field: FormField,
        raw: &str,
        today: CalendarMonth,
    ) -> Result<(), FormTransitionError> {
        self.ensure_editable()?;

        let formatted = self.values.apply(field, raw).to_string();

        if field == FormField::CardNumber {
            self.card_brand = CardBrand::detect(&formatted);
        }

        match validate_field(field, &formatted, today) {
            Ok(()) => {
                self.errors.remove(&field);
            }
            Err(error) => {
                self.errors.insert(field, error);
            }
        }

        if self.state == FormState::EditingWithError {
            self.state = FormState::Editing;
            self.submit_error = None;
        }

        Ok(())
    }

    pub fn begin_submit(
        &mut self,
        today: CalendarMonth,
    ) -> Result<SubmitAttempt, FormTransitionError> {
        self.ensure_editable()?;

        match validate_payment(&self.values, today) {
            Ok(payment) => {
                self.errors.clear();
                self.submit_error = None;
                self.state = FormState::Submitting;
                Ok(SubmitAttempt::Ready {
                    payment,
                    card_brand: self.card_brand,
                })
            }
            Err(errors) => {
                self.errors = errors;
                Ok(SubmitAttempt::Blocked)
            }
        }
    }

    pub fn mark_submitted(&mut self) -> Result<(), FormTransitionError> {
        if self.state != FormState::Submitting {
            return Err(FormTransitionError::NotSubmitting);
        }
        self.state = FormState::Submitted;
        self.notifications.push(Notification::payment_succeeded());
        Ok(())
    }

    /// Returns to editing with every value kept so the user can retry.
    pub fn mark_failed(&mut self) -> Result<(), FormTransitionError> {
        if self.state != FormState::Submitting {
            return Err(FormTransitionError::NotSubmitting);
        }
        self.state = FormState::EditingWithError;
        self.submit_error = Some(PAYMENT_FAILED_MESSAGE.to_string());
        self.notifications.push(Notification::payment_failed());
        Ok(())
    }

    /// Clears values, errors and the detected brand. Pending notifications are
    /// kept until the client has seen them.
    pub fn reset(&mut self) -> Result<(), FormTransitionError> {
        if self.state != FormState::Submitted {
            return Err(FormTransitionError::NotSubmitted);
        }
        let notifications = std::mem::take(&mut self.notifications);
        *self = Self {
            notifications,
            ..Self::default()
        };
        Ok(())
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Builds the client view and hands over pending notifications.
    pub fn snapshot(&mut self, id: Uuid) -> PaymentFormView {
        PaymentFormView {
            id,
            state: self.state,
            values: self.values.clone(),
            errors: self.errors.clone(),
            card_brand: self.card_brand,
            can_submit: self.can_submit(),
            submit_error: self.submit_error.clone(),
            notifications: self.take_notifications(),
        }
    }

    fn ensure_editable(&self) -> Result<(), FormTransitionError> {
        match self.state {
            FormState::Editing | FormState::EditingWithError => Ok(()),
            FormState::Submitting => Err(FormTransitionError::SubmissionInFlight),
            FormState::Submitted => Err(FormTransitionError::AlreadySubmitted),
        }
    }
}
