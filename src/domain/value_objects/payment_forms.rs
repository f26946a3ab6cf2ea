use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{
    enums::{card_brands::CardBrand, form_states::FormState},
    notifications::Notification,
    payment_inputs::PaymentSubmissionInput,
    payment_validation::FieldErrors,
};

/// What a client needs to render one payment form session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFormView {
    pub id: Uuid,
    pub state: FormState,
    pub values: PaymentSubmissionInput,
    pub errors: FieldErrors,
    pub card_brand: Option<CardBrand>,
    pub can_submit: bool,
    pub submit_error: Option<String>,
    pub notifications: Vec<Notification>,
}
