pub mod payment_submissions;
