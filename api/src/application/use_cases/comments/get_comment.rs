use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::comment_repository::CommentRepository;
use crate::domain::noticeboard::comment::EventComment;

pub struct GetComment<'a, C: CommentRepository + ?Sized> {
    pub comments: &'a C,
}

impl<'a, C: CommentRepository + ?Sized> GetComment<'a, C> {
    pub async fn execute(&self, id: Uuid) -> Result<EventComment, AppError> {
        self.comments
            .get(id)
            .await?
            .ok_or(AppError::NotFound("comment"))
    }
}
