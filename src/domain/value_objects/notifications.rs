use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::notification_variants::NotificationVariant;

pub const PAYMENT_FAILED_MESSAGE: &str = "Failed to process your payment. Please try again.";

/// A dismissible toast shown to the user after a submission attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn payment_succeeded() -> Self {
        Self {
            title: "Payment Successful".to_string(),
            description: "Thank you for your purchase!".to_string(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn payment_failed() -> Self {
        Self {
            title: "Error".to_string(),
            description: PAYMENT_FAILED_MESSAGE.to_string(),
            variant: NotificationVariant::Destructive,
        }
    }
}
