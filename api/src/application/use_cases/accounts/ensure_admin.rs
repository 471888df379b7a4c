use crate::application::error::AppError;
use crate::application::ports::user_repository::{NewUser, UserRepository};
use crate::application::use_cases::auth::password::hash_password;
use crate::domain::accounts::user::User;

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub name: String,
    pub mobile: String,
}

/// Creates the configured administrator, or promotes and re-keys an
/// existing account with the same email.
pub struct EnsureAdmin<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> EnsureAdmin<'a, R> {
    pub async fn execute(&self, seed: &AdminSeed) -> Result<User, AppError> {
        let email = seed.email.trim().to_lowercase();
        let password_hash = hash_password(&seed.password)?;
        if let Some(mut user) = self.repo.find_by_email(&email).await? {
            user.is_active = true;
            user.is_staff = true;
            user.is_superuser = true;
            let user = self
                .repo
                .update_user(&user)
                .await?
                .ok_or(AppError::NotFound("user"))?;
            self.repo.set_password(user.id, &password_hash).await?;
            tracing::info!(user_id = %user.id, "admin_updated");
            return Ok(user);
        }
        let user = self
            .repo
            .create_user(&NewUser {
                email,
                name: seed.name.trim().to_string(),
                mobile: seed.mobile.trim().to_string(),
                address: None,
                password_hash,
                is_staff: true,
                is_superuser: true,
            })
            .await?;
        tracing::info!(user_id = %user.id, "admin_created");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryStore;
    use crate::application::use_cases::auth::password::verify_password;

    fn seed(email: &str) -> AdminSeed {
        AdminSeed {
            email: email.into(),
            password: "admin-password".into(),
            name: "Admin".into(),
            mobile: "+15550001111".into(),
        }
    }

    #[tokio::test]
    async fn creates_a_superuser_when_missing() {
        let store = InMemoryStore::default();
        let admin = EnsureAdmin { repo: &store }
            .execute(&seed("Admin@Campus.edu"))
            .await
            .unwrap();
        assert_eq!(admin.email, "admin@campus.edu");
        assert!(admin.is_staff && admin.is_superuser && admin.is_active);
        let hash = store.password_hash(admin.id).await.unwrap().unwrap();
        assert!(verify_password("admin-password", &hash).unwrap());
    }

    #[tokio::test]
    async fn promotes_an_existing_account() {
        let store = InMemoryStore::default();
        let existing = store.seed_user("boss@campus.edu", false);
        store.deactivate(existing.id);
        let admin = EnsureAdmin { repo: &store }
            .execute(&seed("boss@campus.edu"))
            .await
            .unwrap();
        assert_eq!(admin.id, existing.id);
        assert!(admin.is_staff && admin.is_superuser && admin.is_active);
        let hash = store.password_hash(admin.id).await.unwrap().unwrap();
        assert!(verify_password("admin-password", &hash).unwrap());
    }
}
