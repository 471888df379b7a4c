use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::noticeboard::event::RegistrationRefusal;
use crate::domain::noticeboard::registration::EventRegistration;

#[derive(Debug, Clone)]
pub enum RegisterOutcome {
    Created(EventRegistration),
    Existing(EventRegistration),
    Refused(RegistrationRefusal),
    EventMissing,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationFilter {
    pub event_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub attended: Option<bool>,
    /// Matches the event title or the attendee's name and email.
    pub search: Option<String>,
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Get-or-create for (event, user). Capacity and deadline are checked
    /// against the locked event row before inserting.
    async fn register(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<RegisterOutcome>;
    async fn list(&self, filter: &RegistrationFilter) -> anyhow::Result<Vec<EventRegistration>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<EventRegistration>>;
    async fn update(
        &self,
        registration: &EventRegistration,
    ) -> anyhow::Result<Option<EventRegistration>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
