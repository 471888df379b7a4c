use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::attachments::image::Image;
use crate::domain::noticeboard::comment::EventComment;
use crate::domain::noticeboard::event::{Event, EventType};
use crate::domain::noticeboard::registration::EventRegistration;

#[derive(Debug, Clone)]
pub struct EventDto {
    pub event: Event,
    pub images: Vec<Image>,
    pub registrations_count: i64,
}

impl EventDto {
    pub fn primary_image(&self) -> Option<&Image> {
        self.images.iter().find(|i| i.is_primary)
    }
}

#[derive(Debug, Clone)]
pub struct EventDetailDto {
    pub summary: EventDto,
    pub comments: Vec<EventComment>,
    pub registrations: Vec<EventRegistration>,
}

#[derive(Debug, Clone)]
pub struct EventStatisticsDto {
    pub total_registrations: i64,
    pub attended_registrations: i64,
    /// Percentage of registrations marked attended, 0 when nobody registered.
    pub attendance_rate: f64,
    pub comments_count: i64,
    pub images_count: i64,
}

#[derive(Debug, Clone)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub event_type: Option<EventType>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub location: String,
    pub location_url: Option<String>,
    pub is_online: bool,
    pub meeting_link: Option<String>,
    pub max_participants: Option<i32>,
    pub is_free: Option<bool>,
    pub price: Option<Decimal>,
    pub registration_required: bool,
    pub registration_deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<EventType>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub location_url: Option<Option<String>>,
    pub is_online: Option<bool>,
    pub meeting_link: Option<Option<String>>,
    pub max_participants: Option<Option<i32>>,
    pub is_free: Option<bool>,
    pub price: Option<Decimal>,
    pub registration_required: Option<bool>,
    pub registration_deadline: Option<Option<DateTime<Utc>>>,
}
