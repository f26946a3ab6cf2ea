use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::value_objects::{
        enums::card_brands::CardBrand, offers::PURCHASE_AMOUNT, payment_inputs::digits_only,
        payment_validation::ValidatedPayment,
    },
    infrastructure::postgres::schema::payment_submissions,
};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, Deserialize)]
#[diesel(table_name = payment_submissions)]
pub struct PaymentSubmissionEntity {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub card_last_four: String,
    pub card_type: Option<String>,
    pub purchase_amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable, Serialize)]
#[diesel(table_name = payment_submissions)]
pub struct InsertPaymentSubmissionEntity {
    pub full_name: String,
    pub email: String,
    pub card_last_four: String,
    pub card_type: Option<String>,
    pub purchase_amount: f64,
}

impl InsertPaymentSubmissionEntity {
    pub fn from_validated(payment: &ValidatedPayment, card_brand: Option<CardBrand>) -> Self {
        Self {
            full_name: payment.full_name.clone(),
            email: payment.email.clone(),
            card_last_four: card_last_four(&payment.card_number),
            card_type: card_brand.map(|brand| brand.to_string()),
            purchase_amount: PURCHASE_AMOUNT,
        }
    }
}

/// Trailing four digits of a card number, ignoring separators.
pub fn card_last_four(card_number: &str) -> String {
    let digits = digits_only(card_number);
    let start = digits.len().saturating_sub(4);
    digits[start..].to_string()
}
