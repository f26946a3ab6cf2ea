use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
}

impl CardBrand {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
            CardBrand::Amex => "amex",
            CardBrand::Discover => "discover",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "visa" => Some(CardBrand::Visa),
            "mastercard" => Some(CardBrand::Mastercard),
            "amex" => Some(CardBrand::Amex),
            "discover" => Some(CardBrand::Discover),
            _ => None,
        }
    }

    /// Classifies a card number by its leading digits.
    ///
    /// Non-digit characters are ignored, so both raw keystrokes and the grouped
    /// `NNNN-NNNN-...` form classify the same way. Prefixes are tested in a fixed
    /// order and the first match wins; `None` means no known brand.
    pub fn detect(card_number: &str) -> Option<Self> {
        let digits: String = card_number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();

        if digits.starts_with('4') {
            return Some(CardBrand::Visa);
        }
        if matches!(digits.get(0..2), Some("51" | "52" | "53" | "54" | "55")) {
            return Some(CardBrand::Mastercard);
        }
        if digits.starts_with("34") || digits.starts_with("37") {
            return Some(CardBrand::Amex);
        }
        if digits.starts_with("6011") || digits.starts_with("65") {
            return Some(CardBrand::Discover);
        }

        None
    }
}

impl Display for CardBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
