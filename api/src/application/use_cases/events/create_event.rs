use rust_decimal::Decimal;

use crate::application::access::Identity;
use crate::application::dto::events::{EventDto, EventInput};
use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::event_repository::{EventRepository, NewEvent};
use crate::application::use_cases::common::{clean, non_negative, require_text};
use crate::domain::noticeboard::event::schedule_errors;

pub(crate) fn check_capacity(errors: &mut FieldErrors, max: Option<i32>) {
    if matches!(max, Some(m) if m < 1) {
        errors.add(
            "max_participants",
            "Ensure this value is greater than or equal to 1.",
        );
    }
}

/// Staff-created events go live immediately; everyone else's wait for approval.
pub struct CreateEvent<'a, E: EventRepository + ?Sized> {
    pub events: &'a E,
}

impl<'a, E: EventRepository + ?Sized> CreateEvent<'a, E> {
    pub async fn execute(&self, organizer: &Identity, input: EventInput) -> Result<EventDto, AppError> {
        let mut errors = FieldErrors::new();
        let title = require_text(&mut errors, "title", &input.title);
        let description = require_text(&mut errors, "description", &input.description);
        let location = require_text(&mut errors, "location", &input.location);
        non_negative(&mut errors, "price", input.price);
        check_capacity(&mut errors, input.max_participants);
        for (field, msg) in schedule_errors(
            input.start_datetime,
            input.end_datetime,
            input.registration_deadline,
        ) {
            errors.add(field, msg);
        }
        errors.into_result()?;

        let event = self
            .events
            .create(&NewEvent {
                title,
                description,
                event_type: input.event_type.unwrap_or_default(),
                start_datetime: input.start_datetime,
                end_datetime: input.end_datetime,
                location,
                location_url: clean(input.location_url),
                organizer: organizer.id,
                is_online: input.is_online,
                meeting_link: clean(input.meeting_link),
                max_participants: input.max_participants,
                is_free: input.is_free.unwrap_or(true),
                price: input.price.unwrap_or(Decimal::ZERO),
                registration_required: input.registration_required,
                registration_deadline: input.registration_deadline,
                is_approved: organizer.is_staff,
            })
            .await?;
        tracing::info!(event_id = %event.id, organizer = %organizer.id, approved = event.is_approved, "event_created");
        Ok(EventDto {
            event,
            images: Vec::new(),
            registrations_count: 0,
        })
    }
}
