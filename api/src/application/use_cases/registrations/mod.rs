pub mod delete_registration;
pub mod get_registration;
pub mod list_registrations;
pub mod mark_attended;
pub mod update_registration;
