use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::bookbank::request::{BookRequest, BookRequestDetail, RequestStatus};

/// Result of an accept/reject transition attempted inside one transaction.
#[derive(Debug, Clone)]
pub enum DecisionOutcome {
    Applied(BookRequest),
    NotPending(RequestStatus),
    /// Another request for the listing was accepted first.
    BookUnavailable,
    Missing,
}

#[async_trait]
pub trait BookRequestRepository: Send + Sync {
    /// Requests made by `user_id` or addressed to listings they posted.
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<BookRequestDetail>>;
    async fn list_all(&self) -> anyhow::Result<Vec<BookRequestDetail>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<BookRequestDetail>>;
    async fn exists(&self, book_id: Uuid, requested_by: Uuid) -> anyhow::Result<bool>;
    /// `None` when the (book, requester) pair already exists.
    async fn create(
        &self,
        book_id: Uuid,
        requested_by: Uuid,
        message: Option<&str>,
    ) -> anyhow::Result<Option<BookRequest>>;
    /// Marks the request accepted and the listing unavailable, atomically.
    async fn accept(&self, id: Uuid) -> anyhow::Result<DecisionOutcome>;
    async fn reject(&self, id: Uuid) -> anyhow::Result<DecisionOutcome>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
