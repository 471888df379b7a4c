use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::lost_found_repository::LostFoundRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::password::verify_password;

/// Removes an account after re-checking its password. Owned rows go with
/// it through the database cascades; stored image bytes are removed
/// afterwards on a best-effort basis.
pub struct DeleteAccount<'a, UR, IR, LR, SP>
where
    UR: UserRepository + ?Sized,
    IR: ImageRepository + ?Sized,
    LR: LostFoundRepository + ?Sized,
    SP: StoragePort + ?Sized,
{
    pub user_repo: &'a UR,
    pub images: &'a IR,
    pub items: &'a LR,
    pub storage: &'a SP,
}

impl<'a, UR, IR, LR, SP> DeleteAccount<'a, UR, IR, LR, SP>
where
    UR: UserRepository + ?Sized,
    IR: ImageRepository + ?Sized,
    LR: LostFoundRepository + ?Sized,
    SP: StoragePort + ?Sized,
{
    pub async fn execute(&self, user_id: Uuid, password: &str) -> Result<(), AppError> {
        let hash = self
            .user_repo
            .password_hash(user_id)
            .await?
            .ok_or(AppError::NotFound("user"))?;
        if !verify_password(password, &hash)? {
            return Err(AppError::field("password", "Incorrect password."));
        }
        self.purge(user_id).await
    }

    /// Deletes without a password check; callers must have authorized it.
    pub async fn purge(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut keys = self.images.keys_owned_by(user_id).await?;
        keys.extend(self.items.image_keys_for_reporter(user_id).await?);
        if let Some(picture) = self.user_repo.get_profile(user_id).await?.profile_picture {
            keys.push(picture);
        }

        let deleted = self.user_repo.delete_user(user_id).await?;
        if !deleted {
            return Err(AppError::NotFound("user"));
        }

        for key in &keys {
            if let Err(err) = self.storage.delete(key).await {
                tracing::warn!(user_id = %user_id, key = %key, error = ?err, "failed to remove stored image during account deletion");
            }
        }
        tracing::info!(user_id = %user_id, removed_blobs = keys.len(), "account_deleted");
        Ok(())
    }
}
