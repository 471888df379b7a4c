pub mod create_event;
pub mod delete_event;
pub mod event_statistics;
pub mod get_event;
pub mod list_events;
pub mod register_for_event;
pub mod set_event_approval;
pub mod update_event;

use std::collections::HashMap;

use uuid::Uuid;

use crate::application::access::Identity;
use crate::application::dto::events::EventDto;
use crate::application::ports::event_repository::{EventRepository, EventVisibility};
use crate::application::ports::image_repository::ImageRepository;
use crate::domain::attachments::image::{Image, ImageParent, sort_gallery};
use crate::domain::noticeboard::event::Event;

/// Staff see every event; everyone else sees approved events plus the
/// ones they organize.
pub fn visibility_for(identity: Option<&Identity>) -> EventVisibility {
    match identity {
        Some(id) if id.is_staff => EventVisibility::All,
        Some(id) => EventVisibility::ApprovedOrOrganizedBy(id.id),
        None => EventVisibility::ApprovedOnly,
    }
}

pub fn is_visible(event: &Event, visibility: EventVisibility) -> bool {
    match visibility {
        EventVisibility::All => true,
        EventVisibility::ApprovedOnly => event.is_approved,
        EventVisibility::ApprovedOrOrganizedBy(user) => {
            event.is_approved || event.organizer == user
        }
    }
}

pub(crate) async fn summarize<E, I>(
    events_repo: &E,
    images: &I,
    events: Vec<Event>,
) -> anyhow::Result<Vec<EventDto>>
where
    E: EventRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    let ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
    let counts = events_repo.registration_counts(&ids).await?;
    let mut by_parent: HashMap<Uuid, Vec<Image>> = HashMap::new();
    for image in images.list_for_parents(ImageParent::Event, &ids).await? {
        by_parent.entry(image.parent_id).or_default().push(image);
    }
    Ok(events
        .into_iter()
        .map(|event| {
            let mut gallery = by_parent.remove(&event.id).unwrap_or_default();
            sort_gallery(&mut gallery);
            EventDto {
                registrations_count: counts.get(&event.id).copied().unwrap_or(0),
                images: gallery,
                event,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::noticeboard::event::tests::sample_event;

    #[test]
    fn unapproved_events_are_only_visible_to_organizer_and_staff() {
        let organizer = Uuid::new_v4();
        let mut event = sample_event(organizer);
        event.is_approved = false;
        let staff = Identity {
            id: Uuid::new_v4(),
            is_staff: true,
            is_superuser: false,
        };
        let stranger = Identity {
            id: Uuid::new_v4(),
            is_staff: false,
            is_superuser: false,
        };
        let owner = Identity {
            id: organizer,
            is_staff: false,
            is_superuser: false,
        };
        assert!(is_visible(&event, visibility_for(Some(&staff))));
        assert!(is_visible(&event, visibility_for(Some(&owner))));
        assert!(!is_visible(&event, visibility_for(Some(&stranger))));
        assert!(!is_visible(&event, visibility_for(None)));
    }
}
