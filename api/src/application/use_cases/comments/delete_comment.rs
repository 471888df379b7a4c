use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::comment_repository::CommentRepository;

pub struct DeleteComment<'a, C: CommentRepository + ?Sized> {
    pub comments: &'a C,
}

impl<'a, C: CommentRepository + ?Sized> DeleteComment<'a, C> {
    pub async fn execute(&self, identity: &Identity, id: Uuid) -> Result<(), AppError> {
        let comment = self
            .comments
            .get(id)
            .await?
            .ok_or(AppError::NotFound("comment"))?;
        access::require_owner(identity, &comment)?;
        if !self.comments.delete(id).await? {
            return Err(AppError::NotFound("comment"));
        }
        tracing::info!(comment_id = %id, by = %identity.id, "event_comment_deleted");
        Ok(())
    }
}
