use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::dto::events::{EventChanges, EventDto};
use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::event_repository::EventRepository;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::use_cases::common::{clean_change, non_negative, require_text};
use crate::application::use_cases::events::create_event::check_capacity;
use crate::application::use_cases::events::summarize;
use crate::domain::noticeboard::event::schedule_errors;

pub struct UpdateEvent<'a, E, I>
where
    E: EventRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub events: &'a E,
    pub images: &'a I,
}

impl<'a, E, I> UpdateEvent<'a, E, I>
where
    E: EventRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub async fn execute(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: EventChanges,
    ) -> Result<EventDto, AppError> {
        let mut event = self
            .events
            .get(id)
            .await?
            .ok_or(AppError::NotFound("event"))?;
        access::require_owner(identity, &event)?;

        let mut errors = FieldErrors::new();
        if let Some(v) = changes.title {
            event.title = require_text(&mut errors, "title", &v);
        }
        if let Some(v) = changes.description {
            event.description = require_text(&mut errors, "description", &v);
        }
        if let Some(v) = changes.location {
            event.location = require_text(&mut errors, "location", &v);
        }
        if let Some(v) = changes.event_type {
            event.event_type = v;
        }
        if let Some(v) = changes.start_datetime {
            event.start_datetime = v;
        }
        if let Some(v) = changes.end_datetime {
            event.end_datetime = v;
        }
        if let Some(v) = clean_change(changes.location_url) {
            event.location_url = v;
        }
        if let Some(v) = changes.is_online {
            event.is_online = v;
        }
        if let Some(v) = clean_change(changes.meeting_link) {
            event.meeting_link = v;
        }
        if let Some(v) = changes.max_participants {
            check_capacity(&mut errors, v);
            event.max_participants = v;
        }
        if let Some(v) = changes.is_free {
            event.is_free = v;
        }
        if let Some(v) = changes.price {
            non_negative(&mut errors, "price", Some(v));
            event.price = v;
        }
        if let Some(v) = changes.registration_required {
            event.registration_required = v;
        }
        if let Some(v) = changes.registration_deadline {
            event.registration_deadline = v;
        }
        for (field, msg) in schedule_errors(
            event.start_datetime,
            event.end_datetime,
            event.registration_deadline,
        ) {
            errors.add(field, msg);
        }
        errors.into_result()?;

        let event = self
            .events
            .update(&event)
            .await?
            .ok_or(AppError::NotFound("event"))?;
        summarize(self.events, self.images, vec![event])
            .await?
            .pop()
            .ok_or(AppError::NotFound("event"))
    }
}
