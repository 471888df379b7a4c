use crate::application::error::AppError;
use crate::application::ports::comment_repository::{CommentFilter, CommentRepository};
use crate::domain::noticeboard::comment::EventComment;

pub struct ListComments<'a, C: CommentRepository + ?Sized> {
    pub comments: &'a C,
}

impl<'a, C: CommentRepository + ?Sized> ListComments<'a, C> {
    pub async fn execute(&self, filter: &CommentFilter) -> Result<Vec<EventComment>, AppError> {
        Ok(self.comments.list(filter).await?)
    }
}
