use crate::application::dto::accounts::RegisterInput;
use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::user_repository::{NewUser, UserRepository};
use crate::application::use_cases::auth::password::{MIN_PASSWORD_LEN, hash_password};
use crate::application::use_cases::common::clean;
use crate::domain::accounts::user::User;

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterInput) -> Result<User, AppError> {
        let email = req.email.trim().to_lowercase();
        let mobile = req.mobile.trim().to_string();
        let mut errors = FieldErrors::new();
        if req.password != req.password2 {
            errors.add("password", "Password fields didn't match.");
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Ensure this field has at least {MIN_PASSWORD_LEN} characters."),
            );
        }
        if self.repo.find_by_email(&email).await?.is_some() {
            errors.add("email", "user with this email already exists.");
        }
        if self.repo.find_by_mobile(&mobile).await?.is_some() {
            errors.add("mobile", "user with this mobile already exists.");
        }
        errors.into_result()?;

        let user = self
            .repo
            .create_user(&NewUser {
                email,
                name: req.name.trim().to_string(),
                mobile,
                address: clean(req.address.clone()),
                password_hash: hash_password(&req.password)?,
                is_staff: false,
                is_superuser: false,
            })
            .await?;
        tracing::info!(user_id = %user.id, "user_registered");
        Ok(user)
    }
}
