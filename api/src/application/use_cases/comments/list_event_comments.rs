use uuid::Uuid;

use crate::application::access::Identity;
use crate::application::error::AppError;
use crate::application::ports::comment_repository::{CommentFilter, CommentRepository};
use crate::application::ports::event_repository::EventRepository;
use crate::application::use_cases::events::{is_visible, visibility_for};
use crate::domain::noticeboard::comment::EventComment;

/// Comments under one event, oldest first. Hidden events read as missing.
pub struct ListEventComments<'a, E, C>
where
    E: EventRepository + ?Sized,
    C: CommentRepository + ?Sized,
{
    pub events: &'a E,
    pub comments: &'a C,
}

impl<'a, E, C> ListEventComments<'a, E, C>
where
    E: EventRepository + ?Sized,
    C: CommentRepository + ?Sized,
{
    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        event_id: Uuid,
    ) -> Result<Vec<EventComment>, AppError> {
        self.events
            .get(event_id)
            .await?
            .filter(|e| is_visible(e, visibility_for(identity)))
            .ok_or(AppError::NotFound("event"))?;
        let filter = CommentFilter {
            event_id: Some(event_id),
            ..CommentFilter::default()
        };
        Ok(self.comments.list(&filter).await?)
    }
}
