use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::noticeboard::event::{Event, EventType};

/// Which events a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventVisibility {
    All,
    ApprovedOnly,
    ApprovedOrOrganizedBy(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventFilter {
    pub visibility: EventVisibility,
    pub now: DateTime<Utc>,
    pub is_upcoming: Option<bool>,
    pub is_past: Option<bool>,
    pub event_type: Option<EventType>,
    pub is_online: Option<bool>,
    pub is_free: Option<bool>,
    pub registration_required: Option<bool>,
    pub is_approved: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
}

impl EventFilter {
    pub fn new(visibility: EventVisibility, now: DateTime<Utc>) -> Self {
        Self {
            visibility,
            now,
            is_upcoming: None,
            is_past: None,
            event_type: None,
            is_online: None,
            is_free: None,
            registration_required: None,
            is_approved: None,
            start_date: None,
            end_date: None,
            search: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub location: String,
    pub location_url: Option<String>,
    pub organizer: Uuid,
    pub is_online: bool,
    pub meeting_link: Option<String>,
    pub max_participants: Option<i32>,
    pub is_free: bool,
    pub price: Decimal,
    pub registration_required: bool,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub is_approved: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub total_registrations: i64,
    pub attended_registrations: i64,
    pub comments: i64,
    pub images: i64,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn list(&self, filter: &EventFilter) -> anyhow::Result<Vec<Event>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Event>>;
    async fn create(&self, event: &NewEvent) -> anyhow::Result<Event>;
    /// Writes the client-editable columns; approval and organizer are untouched.
    async fn update(&self, event: &Event) -> anyhow::Result<Option<Event>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn set_approved(&self, id: Uuid, approved: bool) -> anyhow::Result<Option<Event>>;
    async fn counts(&self, id: Uuid) -> anyhow::Result<EventCounts>;
    async fn registration_counts(&self, ids: &[Uuid]) -> anyhow::Result<HashMap<Uuid, i64>>;
}
