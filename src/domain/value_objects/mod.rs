pub mod enums;
pub mod notifications;
pub mod offers;
pub mod payment_forms;
pub mod payment_inputs;
pub mod payment_validation;
