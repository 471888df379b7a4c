use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::comment_repository::CommentRepository;
use crate::application::use_cases::common::require_text;
use crate::domain::noticeboard::comment::EventComment;

pub struct UpdateComment<'a, C: CommentRepository + ?Sized> {
    pub comments: &'a C,
}

impl<'a, C: CommentRepository + ?Sized> UpdateComment<'a, C> {
    pub async fn execute(
        &self,
        identity: &Identity,
        id: Uuid,
        content: &str,
    ) -> Result<EventComment, AppError> {
        let comment = self
            .comments
            .get(id)
            .await?
            .ok_or(AppError::NotFound("comment"))?;
        access::require_owner(identity, &comment)?;
        let mut errors = FieldErrors::new();
        let content = require_text(&mut errors, "content", content);
        errors.into_result()?;
        self.comments
            .update_content(id, &content)
            .await?
            .ok_or(AppError::NotFound("comment"))
    }
}
