use uuid::Uuid;

use crate::application::access::Identity;
use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::event_repository::EventRepository;
use crate::application::use_cases::common::require_text;
use crate::application::use_cases::events::{is_visible, visibility_for};
use crate::domain::noticeboard::comment::EventComment;

pub struct CreateComment<'a, E, C>
where
    E: EventRepository + ?Sized,
    C: CommentRepository + ?Sized,
{
    pub events: &'a E,
    pub comments: &'a C,
}

impl<'a, E, C> CreateComment<'a, E, C>
where
    E: EventRepository + ?Sized,
    C: CommentRepository + ?Sized,
{
    pub async fn execute(
        &self,
        identity: &Identity,
        event_id: Uuid,
        content: &str,
    ) -> Result<EventComment, AppError> {
        let mut errors = FieldErrors::new();
        let content = require_text(&mut errors, "content", content);
        errors.into_result()?;
        self.events
            .get(event_id)
            .await?
            .filter(|e| is_visible(e, visibility_for(Some(identity))))
            .ok_or_else(|| AppError::field("event", "Invalid pk - object does not exist."))?;
        let comment = self
            .comments
            .create(event_id, identity.id, &content)
            .await?;
        tracing::info!(comment_id = %comment.id, event_id = %event_id, "event_comment_created");
        Ok(comment)
    }
}
