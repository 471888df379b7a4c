use chrono::{DateTime, Utc};
use uuid::Uuid;

choice_enum! {
    pub enum RequestStatus ("request status") {
        Pending => ("pending", "Pending"),
        Accepted => ("accepted", "Accepted"),
        Rejected => ("rejected", "Rejected"),
        Completed => ("completed", "Completed"),
    }
    default = Pending;
}

#[derive(Debug, Clone)]
pub struct BookRequest {
    pub id: Uuid,
    pub book_id: Uuid,
    pub requested_by: Uuid,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A request joined with the fields of its listing that decisions depend on.
#[derive(Debug, Clone)]
pub struct BookRequestDetail {
    pub request: BookRequest,
    pub book_title: String,
    pub book_owner: Uuid,
    pub book_available: bool,
}
