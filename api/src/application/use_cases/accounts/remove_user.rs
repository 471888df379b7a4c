use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::lost_found_repository::LostFoundRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::delete_account::DeleteAccount;

/// Account removal through the users resource (self or staff).
pub struct RemoveUser<'a, UR, IR, LR, SP>
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

impl<'a, UR, IR, LR, SP> RemoveUser<'a, UR, IR, LR, SP>
where
    UR: UserRepository + ?Sized,
    IR: ImageRepository + ?Sized,
    LR: LostFoundRepository + ?Sized,
    SP: StoragePort + ?Sized,
{
    pub async fn execute(&self, identity: &Identity, user_id: Uuid) -> Result<(), AppError> {
        let target = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("user"))?;
        access::require(
            access::Policy::SelfOrAdmin,
            &access::Actor::User(*identity),
            access::AccessKind::Write,
            &target,
        )?;
        DeleteAccount {
            user_repo: self.user_repo,
            images: self.images,
            items: self.items,
            storage: self.storage,
        }
        .purge(user_id)
        .await
    }
}
