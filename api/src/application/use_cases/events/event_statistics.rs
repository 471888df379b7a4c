use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::dto::events::EventStatisticsDto;
use crate::application::error::AppError;
use crate::application::ports::event_repository::{EventCounts, EventRepository};

pub fn attendance_rate(counts: &EventCounts) -> f64 {
    if counts.total_registrations == 0 {
        return 0.0;
    }
    counts.attended_registrations as f64 / counts.total_registrations as f64 * 100.0
}

pub struct EventStatistics<'a, E: EventRepository + ?Sized> {
    pub events: &'a E,
}

impl<'a, E: EventRepository + ?Sized> EventStatistics<'a, E> {
    pub async fn execute(&self, identity: &Identity, id: Uuid) -> Result<EventStatisticsDto, AppError> {
        access::require_staff(identity)?;
        self.events
            .get(id)
            .await?
            .ok_or(AppError::NotFound("event"))?;
        let counts = self.events.counts(id).await?;
        Ok(EventStatisticsDto {
            total_registrations: counts.total_registrations,
            attended_registrations: counts.attended_registrations,
            attendance_rate: attendance_rate(&counts),
            comments_count: counts.comments,
            images_count: counts.images,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::registration_repository::RegistrationRepository;
    use crate::application::test_support::InMemoryStore;
    use chrono::Utc;

    #[test]
    fn empty_events_have_zero_attendance() {
        assert_eq!(attendance_rate(&EventCounts::default()), 0.0);
        let counts = EventCounts {
            total_registrations: 4,
            attended_registrations: 1,
            ..Default::default()
        };
        assert_eq!(attendance_rate(&counts), 25.0);
    }

    #[tokio::test]
    async fn counts_registrations_and_attendance() {
        let store = InMemoryStore::default();
        let staff = store.seed_user("admin@campus.edu", true);
        let a = store.seed_user("a@campus.edu", false);
        let b = store.seed_user("b@campus.edu", false);
        let event = store.seed_event(staff.id, true);
        store.register(event.id, a.id, None, Utc::now()).await.unwrap();
        store.register(event.id, b.id, None, Utc::now()).await.unwrap();
        store.mark_attended(event.id, a.id);

        let stats = EventStatistics { events: &store }
            .execute(&Identity::from_user(&staff), event.id)
            .await
            .unwrap();
        assert_eq!(stats.total_registrations, 2);
        assert_eq!(stats.attended_registrations, 1);
        assert_eq!(stats.attendance_rate, 50.0);
        assert_eq!(stats.comments_count, 0);
    }
}
