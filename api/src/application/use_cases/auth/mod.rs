pub mod change_password;
pub mod delete_account;
pub mod login;
pub mod me;
pub mod password;
pub mod register;
pub mod resolve_identity;
pub mod update_profile;
