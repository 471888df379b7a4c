pub mod comment;
pub mod event;
pub mod registration;
