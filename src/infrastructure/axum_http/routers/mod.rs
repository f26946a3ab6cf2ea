pub mod offers;
pub mod payment_forms;
pub mod payment_submissions;
