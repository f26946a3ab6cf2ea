use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum FormState {
    #[default]
    Editing,
    Submitting,
    Submitted,
    EditingWithError,
}

impl FormState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormState::Editing => "editing",
            FormState::Submitting => "submitting",
            FormState::Submitted => "submitted",
            FormState::EditingWithError => "editingWithError",
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, FormState::Editing | FormState::EditingWithError)
    }
}

impl Display for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
