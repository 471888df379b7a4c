use crate::domain::accounts::user::{Profile, User};

#[derive(Debug, Clone)]
pub struct AccountDto {
    pub user: User,
    pub profile: Profile,
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub name: String,
    pub mobile: String,
    pub address: Option<String>,
    pub password: String,
    pub password2: String,
}

// Option<Option<_>>: None => keep; Some(None) => clear; Some(Some(v)) => set
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub department: Option<Option<String>>,
    pub student_id: Option<Option<String>>,
    /// Only honoured for staff callers.
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
}
