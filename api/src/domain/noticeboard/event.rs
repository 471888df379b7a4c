use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

choice_enum! {
    pub enum EventType ("event type") {
        Workshop => ("workshop", "Workshop"),
        Seminar => ("seminar", "Seminar"),
        Conference => ("conference", "Conference"),
        Social => ("social", "Social"),
        Sports => ("sports", "Sports"),
        Cultural => ("cultural", "Cultural"),
        Other => ("other", "Other"),
    }
    default = Other;
}

#[derive(Debug, Clone)]
pub struct Event {
    pub id: Uuid,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why a new registration was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationRefusal {
    DeadlinePassed,
    Full,
}

impl RegistrationRefusal {
    pub fn message(&self) -> &'static str {
        match self {
            RegistrationRefusal::DeadlinePassed => "Registration deadline has passed.",
            RegistrationRefusal::Full => "Event is full.",
        }
    }
}

impl Event {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_datetime > now
    }

    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        self.start_datetime <= now && now <= self.end_datetime
    }

    /// Decides whether one more attendee may register, given how many are
    /// already registered. Existing registrations are never refused, and
    /// events without required registration accept everyone.
    pub fn registration_refusal(
        &self,
        registered: i64,
        now: DateTime<Utc>,
    ) -> Option<RegistrationRefusal> {
        if !self.registration_required {
            return None;
        }
        if let Some(deadline) = self.registration_deadline {
            if now > deadline {
                return Some(RegistrationRefusal::DeadlinePassed);
            }
        }
        match self.max_participants {
            Some(max) if registered >= i64::from(max) => Some(RegistrationRefusal::Full),
            _ => None,
        }
    }
}

/// Schedule problems, keyed by the field they are reported against.
pub fn schedule_errors(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
) -> Vec<(&'static str, &'static str)> {
    let mut errors = Vec::new();
    if end < start {
        errors.push((
            "end_datetime",
            "End datetime must occur after start datetime",
        ));
    }
    if let Some(deadline) = deadline {
        if deadline > start {
            errors.push((
                "registration_deadline",
                "Registration deadline must be before the event starts",
            ));
        }
    }
    errors
}
