use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::accounts::user::{Profile, User};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub mobile: String,
    pub address: Option<String>,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_mobile(&self, mobile: &str) -> anyhow::Result<Option<User>>;
    async fn password_hash(&self, id: Uuid) -> anyhow::Result<Option<String>>;
    async fn list_users(&self, search: Option<&str>) -> anyhow::Result<Vec<User>>;
    /// Persists name, mobile, address and the account flags of `user`.
    async fn update_user(&self, user: &User) -> anyhow::Result<Option<User>>;
    async fn set_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()>;
    async fn touch_last_login(&self, id: Uuid) -> anyhow::Result<()>;
    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Missing profiles read as empty.
    async fn get_profile(&self, user_id: Uuid) -> anyhow::Result<Profile>;
    async fn save_profile(&self, user_id: Uuid, profile: &Profile) -> anyhow::Result<Profile>;
}
