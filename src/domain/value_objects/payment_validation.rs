use std::{collections::BTreeMap, sync::LazyLock};

use chrono::{Datelike, Local};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    enums::form_fields::FormField, payment_inputs::PaymentSubmissionInput,
};

pub const MIN_FULL_NAME_LEN: usize = 2;
pub const CARD_NUMBER_LEN: usize = 19;

// Local part and domain follow the usual web-form email grammar: the domain needs at
// least one dot and a TLD of two or more letters. Leading and doubled dots in the
// local part are rejected separately because the regex crate has no lookaround.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .expect("EMAIL_REGEX: invalid regex pattern")
});

static CARD_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4}-){3}[0-9]{4}$").expect("CARD_NUMBER_REGEX: invalid regex pattern")
});

static EXPIRY_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])/([0-9]{2})$").expect("EXPIRY_DATE_REGEX: invalid regex pattern")
});

static CVV_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").expect("CVV_REGEX: invalid regex pattern"));

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldErrorKind {
    TooShort,
    InvalidFormat,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    fn new(kind: FieldErrorKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

pub type FieldErrors = BTreeMap<FormField, FieldError>;

/// The month a card expiry is checked against, as a two-digit year and a 1-12 month.
///
/// Years are compared without a century, so a card expiring in `01/00` looks
/// expired during 2099. The product is not expected to live across a century
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    pub year2: u32,
    pub month: u32,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year2: year.rem_euclid(100) as u32,
            month,
        }
    }

    pub fn from_date<D: Datelike>(date: &D) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn current() -> Self {
        Self::from_date(&Local::now())
    }
}

/// Form values that passed every field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPayment {
    pub full_name: String,
    pub email: String,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
}

pub fn validate_full_name(value: &str) -> Result<(), FieldError> {
    if value.trim().chars().count() < MIN_FULL_NAME_LEN {
        return Err(FieldError::new(
            FieldErrorKind::TooShort,
            "Name must be at least 2 characters.",
        ));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), FieldError> {
    let local_part = value.split('@').next().unwrap_or_default();
    if local_part.starts_with('.') || local_part.contains("..") || !EMAIL_REGEX.is_match(value) {
        return Err(FieldError::new(
            FieldErrorKind::InvalidFormat,
            "Please enter a valid email address.",
        ));
    }
    Ok(())
}

pub fn validate_card_number(value: &str) -> Result<(), FieldError> {
    if value.len() < CARD_NUMBER_LEN {
        return Err(FieldError::new(
            FieldErrorKind::InvalidFormat,
            "Please enter a valid card number.",
        ));
    }
    if !CARD_NUMBER_REGEX.is_match(value) {
        return Err(FieldError::new(
            FieldErrorKind::InvalidFormat,
            "Card number must be in format: 1234-5678-9012-3456",
        ));
    }
    Ok(())
}

pub fn validate_expiry_date(value: &str, today: CalendarMonth) -> Result<(), FieldError> {
    let Some(captures) = EXPIRY_DATE_REGEX.captures(value) else {
        return Err(FieldError::new(
            FieldErrorKind::InvalidFormat,
            "Expiry date must be in format: MM/YY",
        ));
    };

    // both groups are two ASCII digits after a successful match
    let month: u32 = captures[1].parse().unwrap_or_default();
    let year: u32 = captures[2].parse().unwrap_or_default();

    let not_expired = year > today.year2 || (year == today.year2 && month >= today.month);
    if !not_expired {
        return Err(FieldError::new(FieldErrorKind::Expired, "Card has expired"));
    }
    Ok(())
}

pub fn validate_cvv(value: &str) -> Result<(), FieldError> {
    if !CVV_REGEX.is_match(value) {
        return Err(FieldError::new(
            FieldErrorKind::InvalidFormat,
            "CVV must be 3 or 4 digits.",
        ));
    }
    Ok(())
}

pub fn validate_field(field: FormField, value: &str, today: CalendarMonth) -> Result<(), FieldError> {
    match field {
        FormField::FullName => validate_full_name(value),
        FormField::Email => validate_email(value),
        FormField::CardNumber => validate_card_number(value),
        FormField::ExpiryDate => validate_expiry_date(value, today),
        FormField::Cvv => validate_cvv(value),
    }
}

/// Checks every field independently and returns either the normalized values or
/// one error per failing field.
pub fn validate_payment(
    input: &PaymentSubmissionInput,
    today: CalendarMonth,
) -> Result<ValidatedPayment, FieldErrors> {
    let errors: FieldErrors = FormField::ALL
        .into_iter()
        .filter_map(|field| {
            validate_field(field, input.value(field), today)
                .err()
                .map(|error| (field, error))
        })
        .collect();

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidatedPayment {
        full_name: input.full_name.trim().to_string(),
        email: input.email.clone(),
        card_number: input.card_number.clone(),
        expiry_date: input.expiry_date.clone(),
        cvv: input.cvv.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const MARCH_2025: CalendarMonth = CalendarMonth {
        year2: 25,
        month: 3,
    };

    fn valid_input() -> PaymentSubmissionInput {
        PaymentSubmissionInput {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            card_number: "4111-1111-1111-1111".to_string(),
            expiry_date: "12/30".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn full_name_needs_two_characters_after_trim() {
        assert!(validate_full_name("Jo").is_ok());
        assert_eq!(
            validate_full_name(" J ").unwrap_err().kind,
            FieldErrorKind::TooShort
        );
        assert_eq!(validate_full_name("").unwrap_err().kind, FieldErrorKind::TooShort);
    }

    #[test]
    fn email_grammar() {
        for ok in ["a@b.com", "jane.doe+news@mail.example.org", "o'neil@example.ie"] {
            assert!(validate_email(ok).is_ok(), "{ok} should be accepted");
        }
        for bad in [
            "",
            "plain",
            "a@b",
            "a@b.c",
            "@b.com",
            ".a@b.com",
            "a..b@b.com",
            "a@-b.com",
            "a b@b.com",
        ] {
            let err = validate_email(bad).unwrap_err();
            assert_eq!(err.kind, FieldErrorKind::InvalidFormat, "{bad} should be rejected");
        }
    }

    #[test]
    fn card_number_requires_four_full_groups() {
        assert!(validate_card_number("4111-1111-1111-1111").is_ok());

        let short = validate_card_number("4111-1111-1111-111").unwrap_err();
        assert_eq!(short.kind, FieldErrorKind::InvalidFormat);
        assert_eq!(short.message, "Please enter a valid card number.");

        let shape = validate_card_number("4111111111111111111").unwrap_err();
        assert_eq!(shape.kind, FieldErrorKind::InvalidFormat);
        assert_eq!(
            shape.message,
            "Card number must be in format: 1234-5678-9012-3456"
        );
    }

    #[test]
    fn expiry_is_checked_against_current_month() {
        assert_eq!(
            validate_expiry_date("02/25", MARCH_2025).unwrap_err().kind,
            FieldErrorKind::Expired
        );
        assert!(validate_expiry_date("03/25", MARCH_2025).is_ok());
        assert!(validate_expiry_date("01/26", MARCH_2025).is_ok());
        assert_eq!(
            validate_expiry_date("12/24", MARCH_2025).unwrap_err().kind,
            FieldErrorKind::Expired
        );
    }

    #[test]
    fn expiry_format_is_checked_before_expiry() {
        for bad in ["13/30", "00/30", "1/30", "12/3", "1230", ""] {
            assert_eq!(
                validate_expiry_date(bad, MARCH_2025).unwrap_err().kind,
                FieldErrorKind::InvalidFormat,
                "{bad} should be a format error"
            );
        }
    }

    #[test]
    fn expiry_comparison_ignores_century() {
        let december_2099 = CalendarMonth::new(2099, 12);
        assert_eq!(
            validate_expiry_date("01/00", december_2099).unwrap_err().kind,
            FieldErrorKind::Expired
        );
    }

    #[test]
    fn cvv_is_three_or_four_digits() {
        assert!(validate_cvv("123").is_ok());
        assert!(validate_cvv("1234").is_ok());
        for bad in ["12", "12345", "12a", ""] {
            assert_eq!(validate_cvv(bad).unwrap_err().kind, FieldErrorKind::InvalidFormat);
        }
    }

    #[test]
    fn only_ascii_digits_count() {
        assert!(validate_cvv("\u{661}\u{662}\u{663}").is_err());
        let arabic_indic_group = "\u{664}\u{661}\u{661}\u{661}";
        let card_number = [arabic_indic_group; 4].join("-");
        assert!(validate_card_number(&card_number).is_err());
        assert!(validate_expiry_date("\u{661}\u{662}/\u{663}\u{660}", MARCH_2025).is_err());
    }

    #[test]
    fn calendar_month_uses_two_digit_year() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(CalendarMonth::from_date(&date), MARCH_2025);
    }

    #[test]
    fn valid_payment_is_normalized() {
        let mut input = valid_input();
        input.full_name = "  Jane Doe ".to_string();

        let payment = validate_payment(&input, MARCH_2025).unwrap();
        assert_eq!(payment.full_name, "Jane Doe");
        assert_eq!(payment.card_number, "4111-1111-1111-1111");
    }

    #[test]
    fn every_failing_field_is_reported() {
        let input = PaymentSubmissionInput {
            full_name: "J".to_string(),
            email: "jane@example.com".to_string(),
            card_number: "4111-1111".to_string(),
            expiry_date: "02/25".to_string(),
            cvv: "1".to_string(),
        };

        let errors = validate_payment(&input, MARCH_2025).unwrap_err();
        assert_eq!(
            errors.keys().copied().collect::<Vec<_>>(),
            vec![
                FormField::FullName,
                FormField::CardNumber,
                FormField::ExpiryDate,
                FormField::Cvv
            ]
        );
        assert_eq!(errors[&FormField::ExpiryDate].kind, FieldErrorKind::Expired);
    }

    #[test]
    fn empty_form_is_invalid() {
        let errors = validate_payment(&PaymentSubmissionInput::default(), MARCH_2025).unwrap_err();
        assert_eq!(errors.len(), FormField::ALL.len());
    }
}
