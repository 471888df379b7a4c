use uuid::Uuid;

use crate::application::dto::accounts::AccountDto;
use crate::application::error::AppError;
use crate::application::ports::user_repository::UserRepository;

pub struct GetMe<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetMe<'a, R> {
    pub async fn execute(&self, id: Uuid) -> Result<AccountDto, AppError> {
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("user"))?;
        let profile = self.repo.get_profile(id).await?;
        Ok(AccountDto { user, profile })
    }
}
