use crate::application::error::AppError;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::password::verify_password;
use crate::domain::accounts::user::User;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> Result<User, AppError> {
        let email = req.email.trim().to_lowercase();
        let user = match self.repo.find_by_email(&email).await? {
            Some(u) if u.is_active => u,
            _ => return Err(AppError::Unauthenticated),
        };
        let hash = self.repo.password_hash(user.id).await?.unwrap_or_default();
        if !verify_password(&req.password, &hash)? {
            tracing::debug!(user_id = %user.id, "login_rejected");
            return Err(AppError::Unauthenticated);
        }
        self.repo.touch_last_login(user.id).await?;
        Ok(user)
    }
}
