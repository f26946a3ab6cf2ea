use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::form_fields::FormField;

pub const CARD_NUMBER_DIGITS: usize = 16;
pub const CARD_NUMBER_GROUP_LEN: usize = 4;
pub const EXPIRY_DATE_DIGITS: usize = 4;
pub const CVV_MAX_DIGITS: usize = 4;

/// Raw values of the payment form as the user typed them, after per-keystroke
/// formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentSubmissionInput {
    pub full_name: String,
    pub email: String,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
}

impl PaymentSubmissionInput {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::FullName => &self.full_name,
            FormField::Email => &self.email,
            FormField::CardNumber => &self.card_number,
            FormField::ExpiryDate => &self.expiry_date,
            FormField::Cvv => &self.cvv,
        }
    }

    /// Formats `raw` the way the field's input mask does and stores the result.
    pub fn apply(&mut self, field: FormField, raw: &str) -> &str {
        let formatted = format_field(field, raw);
        let slot = match field {
            FormField::FullName => &mut self.full_name,
            FormField::Email => &mut self.email,
            FormField::CardNumber => &mut self.card_number,
            FormField::ExpiryDate => &mut self.expiry_date,
            FormField::Cvv => &mut self.cvv,
        };
        *slot = formatted;
        slot
    }

    /// Runs every field through its input mask, for callers that post a whole
    /// form without going through per-keystroke updates.
    pub fn formatted(&self) -> Self {
        let mut formatted = Self::default();
        for field in FormField::ALL {
            formatted.apply(field, self.value(field));
        }
        formatted
    }
}

pub fn format_field(field: FormField, raw: &str) -> String {
    match field {
        FormField::FullName | FormField::Email => raw.to_string(),
        FormField::CardNumber => format_card_number(raw),
        FormField::ExpiryDate => format_expiry_date(raw),
        FormField::Cvv => sanitize_cvv(raw),
    }
}

pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Groups up to 16 digits into blocks of four joined by `-`.
///
/// Anything that is not an ASCII digit is dropped first. A partially typed group
/// stays short at the end (`"41111"` becomes `"4111-1"`).
pub fn format_card_number(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(CARD_NUMBER_DIGITS)
        .collect();

    digits
        .chunks(CARD_NUMBER_GROUP_LEN)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}

/// Masks input as `MM/YY`. Up to two digits are returned as-is while the month is
/// still being typed; digits past the fourth are dropped.
pub fn format_expiry_date(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() <= 2 {
        return digits;
    }

    // digits are ASCII so byte offsets are char offsets
    let end = digits.len().min(EXPIRY_DATE_DIGITS);
    format!("{}/{}", &digits[..2], &digits[2..end])
}

pub fn sanitize_cvv(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(CVV_MAX_DIGITS)
        .collect()
}
