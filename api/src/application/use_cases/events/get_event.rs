use uuid::Uuid;

use crate::application::dto::events::EventDetailDto;
use crate::application::error::AppError;
use crate::application::ports::comment_repository::{CommentFilter, CommentRepository};
use crate::application::ports::event_repository::{EventRepository, EventVisibility};
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::registration_repository::{
    RegistrationFilter, RegistrationRepository,
};
use crate::application::use_cases::events::{is_visible, summarize};

/// Event detail with its comments and registrations. Events the caller
/// may not see are reported as missing.
pub struct GetEvent<'a, E, I, C, R>
where
    E: EventRepository + ?Sized,
    I: ImageRepository + ?Sized,
    C: CommentRepository + ?Sized,
    R: RegistrationRepository + ?Sized,
{
    pub events: &'a E,
    pub images: &'a I,
    pub comments: &'a C,
    pub registrations: &'a R,
}

impl<'a, E, I, C, R> GetEvent<'a, E, I, C, R>
where
    E: EventRepository + ?Sized,
    I: ImageRepository + ?Sized,
    C: CommentRepository + ?Sized,
    R: RegistrationRepository + ?Sized,
{
    pub async fn execute(
        &self,
        id: Uuid,
        visibility: EventVisibility,
    ) -> Result<EventDetailDto, AppError> {
        let event = self
            .events
            .get(id)
            .await?
            .filter(|e| is_visible(e, visibility))
            .ok_or(AppError::NotFound("event"))?;
        let summary = summarize(self.events, self.images, vec![event])
            .await?
            .pop()
            .ok_or(AppError::NotFound("event"))?;
        let comments = self
            .comments
            .list(&CommentFilter {
                event_id: Some(id),
                ..Default::default()
            })
            .await?;
        let registrations = self
            .registrations
            .list(&RegistrationFilter {
                event_id: Some(id),
                ..Default::default()
            })
            .await?;
        Ok(EventDetailDto {
            summary,
            comments,
            registrations,
        })
    }
}
