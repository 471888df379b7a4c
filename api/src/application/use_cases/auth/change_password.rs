use uuid::Uuid;

use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::password::{
    MIN_PASSWORD_LEN, hash_password, verify_password,
};

pub struct ChangePassword<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub password: String,
    pub password2: String,
}

impl<'a, R: UserRepository + ?Sized> ChangePassword<'a, R> {
    pub async fn execute(&self, user_id: Uuid, req: &ChangePasswordRequest) -> Result<(), AppError> {
        let hash = self
            .repo
            .password_hash(user_id)
            .await?
            .ok_or(AppError::NotFound("user"))?;
        let mut errors = FieldErrors::new();
        if !verify_password(&req.old_password, &hash)? {
            errors.add("old_password", "Old password is not correct.");
        }
        if req.password != req.password2 {
            errors.add("password", "Password fields didn't match.");
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Ensure this field has at least {MIN_PASSWORD_LEN} characters."),
            );
        }
        errors.into_result()?;
        self.repo
            .set_password(user_id, &hash_password(&req.password)?)
            .await?;
        tracing::info!(user_id = %user_id, "password_changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryStore;
    use crate::application::use_cases::auth::login::{Login, LoginRequest};

    #[tokio::test]
    async fn new_password_takes_effect() {
        let store = InMemoryStore::default();
        let user = store.seed_user_with_password("p@campus.edu", "first-pass", false);
        ChangePassword { repo: &store }
            .execute(
                user.id,
                &ChangePasswordRequest {
                    old_password: "first-pass".into(),
                    password: "second-pass".into(),
                    password2: "second-pass".into(),
                },
            )
            .await
            .unwrap();
        let login = Login { repo: &store };
        assert!(
            login
                .execute(&LoginRequest {
                    email: "p@campus.edu".into(),
                    password: "second-pass".into(),
                })
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn wrong_old_password_is_a_field_error() {
        let store = InMemoryStore::default();
        let user = store.seed_user_with_password("p@campus.edu", "first-pass", false);
        let res = ChangePassword { repo: &store }
            .execute(
                user.id,
                &ChangePasswordRequest {
                    old_password: "guess-pass".into(),
                    password: "second-pass".into(),
                    password2: "second-pass".into(),
                },
            )
            .await;
        assert!(matches!(res, Err(AppError::Validation(f)) if f.contains("old_password")));
    }
}
