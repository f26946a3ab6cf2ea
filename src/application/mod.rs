pub mod form_sessions;
pub mod usecases;
