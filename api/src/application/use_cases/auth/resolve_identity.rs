use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::accounts::user::User;

/// Loads the account behind a verified token subject. Deleted or
/// deactivated accounts no longer authenticate.
pub struct ResolveIdentity<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ResolveIdentity<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, AppError> {
        match self.repo.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AppError::Unauthenticated),
        }
    }
}
