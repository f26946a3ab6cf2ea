use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FullName,
    Email,
    CardNumber,
    ExpiryDate,
    Cvv,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::FullName,
        FormField::Email,
        FormField::CardNumber,
        FormField::ExpiryDate,
        FormField::Cvv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::FullName => "fullName",
            FormField::Email => "email",
            FormField::CardNumber => "cardNumber",
            FormField::ExpiryDate => "expiryDate",
            FormField::Cvv => "cvv",
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
