use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::event_repository::EventRepository;
use crate::domain::noticeboard::event::Event;

pub struct SetEventApproval<'a, E: EventRepository + ?Sized> {
    pub events: &'a E,
}

impl<'a, E: EventRepository + ?Sized> SetEventApproval<'a, E> {
    pub async fn execute(
        &self,
        identity: &Identity,
        id: Uuid,
        approved: bool,
    ) -> Result<Event, AppError> {
        access::require_staff(identity)?;
        let event = self
            .events
            .set_approved(id, approved)
            .await?
            .ok_or(AppError::NotFound("event"))?;
        tracing::info!(event_id = %id, approved, by = %identity.id, "event_approval_changed");
        Ok(event)
    }
}
