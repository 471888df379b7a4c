use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::accounts::user::User;

pub struct ListUsers<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ListUsers<'a, R> {
    pub async fn execute(
        &self,
        identity: &Identity,
        search: Option<&str>,
    ) -> Result<Vec<User>, AppError> {
        access::require_staff(identity)?;
        Ok(self.repo.list_users(search).await?)
    }
}
