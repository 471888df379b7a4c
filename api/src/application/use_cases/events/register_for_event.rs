use chrono::Utc;
use uuid::Uuid;

use crate::application::access::Identity;
use crate::application::error::AppError;
use crate::application::ports::event_repository::EventRepository;
use crate::application::ports::registration_repository::{
    RegisterOutcome, RegistrationRepository,
};
use crate::application::use_cases::common::clean;
use crate::application::use_cases::events::{is_visible, visibility_for};
use crate::domain::noticeboard::registration::EventRegistration;

#[derive(Debug, Clone)]
pub struct Registered {
    pub registration: EventRegistration,
    /// `false` when the caller was already registered.
    pub created: bool,
}

pub struct RegisterForEvent<'a, E, R>
where
    E: EventRepository + ?Sized,
    R: RegistrationRepository + ?Sized,
{
    pub events: &'a E,
    pub registrations: &'a R,
}

impl<'a, E, R> RegisterForEvent<'a, E, R>
where
    E: EventRepository + ?Sized,
    R: RegistrationRepository + ?Sized,
{
    pub async fn execute(
        &self,
        identity: &Identity,
        event_id: Uuid,
        notes: Option<String>,
    ) -> Result<Registered, AppError> {
        self.events
            .get(event_id)
            .await?
            .filter(|e| is_visible(e, visibility_for(Some(identity))))
            .ok_or(AppError::NotFound("event"))?;
        let notes = clean(notes);
        match self
            .registrations
            .register(event_id, identity.id, notes.as_deref(), Utc::now())
            .await?
        {
            RegisterOutcome::Created(registration) => {
                tracing::info!(event_id = %event_id, user_id = %identity.id, "event_registration_created");
                Ok(Registered {
                    registration,
                    created: true,
                })
            }
            RegisterOutcome::Existing(registration) => Ok(Registered {
                registration,
                created: false,
            }),
            RegisterOutcome::Refused(reason) => Err(AppError::invalid(reason.message())),
            RegisterOutcome::EventMissing => Err(AppError::NotFound("event")),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::application::test_support::InMemoryStore;

    #[tokio::test]
    async fn registering_twice_returns_the_existing_row() {
        let store = InMemoryStore::default();
        let organizer = store.seed_user("org@campus.edu", false);
        let attendee = store.seed_user("a@campus.edu", false);
        let event = store.seed_event(organizer.id, true);
        let uc = RegisterForEvent {
            events: &store,
            registrations: &store,
        };
        let id = Identity::from_user(&attendee);
        let first = uc.execute(&id, event.id, Some("vegan".into())).await.unwrap();
        assert!(first.created);
        let second = uc.execute(&id, event.id, None).await.unwrap();
        assert!(!second.created);
        assert_eq!(first.registration.id, second.registration.id);
        assert_eq!(second.registration.notes.as_deref(), Some("vegan"));
    }

    #[tokio::test]
    async fn full_events_refuse_new_attendees() {
        let store = InMemoryStore::default();
        let organizer = store.seed_user("org@campus.edu", false);
        let a = store.seed_user("a@campus.edu", false);
        let b = store.seed_user("b@campus.edu", false);
        let event = store.seed_event(organizer.id, true);
        store.update_event(event.id, |e| e.max_participants = Some(1));
        let uc = RegisterForEvent {
            events: &store,
            registrations: &store,
        };
        uc.execute(&Identity::from_user(&a), event.id, None)
            .await
            .unwrap();
        let res = uc.execute(&Identity::from_user(&b), event.id, None).await;
        assert!(matches!(res, Err(AppError::Invalid(m)) if m == "Event is full."));
        // an existing attendee is not turned away by the cap
        assert!(
            uc.execute(&Identity::from_user(&a), event.id, None)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn open_events_admit_past_the_cap() {
        let store = InMemoryStore::default();
        let organizer = store.seed_user("org@campus.edu", false);
        let a = store.seed_user("a@campus.edu", false);
        let b = store.seed_user("b@campus.edu", false);
        let event = store.seed_event(organizer.id, true);
        store.update_event(event.id, |e| {
            e.registration_required = false;
            e.max_participants = Some(1);
        });
        let uc = RegisterForEvent {
            events: &store,
            registrations: &store,
        };
        uc.execute(&Identity::from_user(&a), event.id, None)
            .await
            .unwrap();
        let second = uc
            .execute(&Identity::from_user(&b), event.id, None)
            .await
            .unwrap();
        assert!(second.created);
    }

    #[tokio::test]
    async fn closed_registration_is_refused() {
        let store = InMemoryStore::default();
        let organizer = store.seed_user("org@campus.edu", false);
        let a = store.seed_user("a@campus.edu", false);
        let event = store.seed_event(organizer.id, true);
        store.update_event(event.id, |e| {
            e.registration_deadline = Some(Utc::now() - Duration::hours(1))
        });
        let res = RegisterForEvent {
            events: &store,
            registrations: &store,
        }
        .execute(&Identity::from_user(&a), event.id, None)
        .await;
        assert!(
            matches!(res, Err(AppError::Invalid(m)) if m == "Registration deadline has passed.")
        );
    }

    #[tokio::test]
    async fn pending_events_cannot_be_joined_by_others() {
        let store = InMemoryStore::default();
        let organizer = store.seed_user("org@campus.edu", false);
        let a = store.seed_user("a@campus.edu", false);
        let event = store.seed_event(organizer.id, false);
        let res = RegisterForEvent {
            events: &store,
            registrations: &store,
        }
        .execute(&Identity::from_user(&a), event.id, None)
        .await;
        assert!(matches!(res, Err(AppError::NotFound(_))));
    }
}
