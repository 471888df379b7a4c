use uuid::Uuid;

use crate::application::access::{self, Identity, OwnerRef};
use crate::application::error::AppError;
use crate::application::ports::book_request_repository::{BookRequestRepository, DecisionOutcome};
use crate::application::use_cases::book_requests::get_request::GetBookRequest;
use crate::domain::bookbank::request::BookRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDecision {
    Accept,
    Reject,
}

/// Accepts or rejects a pending request on behalf of the listing's owner.
/// Accepting also takes the listing off the market in the same transaction.
pub struct DecideBookRequest<'a, R: BookRequestRepository + ?Sized> {
    pub requests: &'a R,
}

impl<'a, R: BookRequestRepository + ?Sized> DecideBookRequest<'a, R> {
    pub async fn execute(
        &self,
        identity: &Identity,
        id: Uuid,
        decision: RequestDecision,
    ) -> Result<BookRequest, AppError> {
        let detail = GetBookRequest {
            requests: self.requests,
        }
        .execute(identity, id)
        .await?;
        access::require_owner(identity, &OwnerRef::PostedBy(detail.book_owner))?;

        let outcome = match decision {
            RequestDecision::Accept => self.requests.accept(id).await?,
            RequestDecision::Reject => self.requests.reject(id).await?,
        };
        match outcome {
            DecisionOutcome::Applied(request) => {
                tracing::info!(request_id = %id, book_id = %request.book_id, decision = ?decision, "book_request_decided");
                Ok(request)
            }
            DecisionOutcome::NotPending(status) => Err(AppError::invalid(format!(
                "Only pending requests can be {}; this one is {}.",
                match decision {
                    RequestDecision::Accept => "accepted",
                    RequestDecision::Reject => "rejected",
                },
                status
            ))),
            DecisionOutcome::BookUnavailable => {
                Err(AppError::invalid("This book is no longer available."))
            }
            DecisionOutcome::Missing => Err(AppError::NotFound("book request")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::book_repository::BookRepository;
    use crate::application::test_support::InMemoryStore;
    use crate::domain::bookbank::request::RequestStatus;

    struct Fixture {
        store: InMemoryStore,
        owner: Identity,
        buyer: Identity,
        book_id: Uuid,
        request_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryStore::default();
        let owner = store.seed_user("a@campus.edu", false);
        let buyer = store.seed_user("b@campus.edu", false);
        let book = store.seed_book(owner.id);
        let request = store.seed_request(book.id, buyer.id);
        Fixture {
            owner: Identity::from_user(&owner),
            buyer: Identity::from_user(&buyer),
            book_id: book.id,
            request_id: request.id,
            store,
        }
    }

    #[tokio::test]
    async fn approving_marks_book_unavailable() {
        let f = fixture().await;
        let uc = DecideBookRequest { requests: &f.store };
        let req = uc
            .execute(&f.owner, f.request_id, RequestDecision::Accept)
            .await
            .unwrap();
        assert_eq!(req.status, RequestStatus::Accepted);
        let book = BookRepository::get(&f.store, f.book_id).await.unwrap().unwrap();
        assert!(!book.is_available);
    }

    #[tokio::test]
    async fn rejecting_leaves_book_available() {
        let f = fixture().await;
        let uc = DecideBookRequest { requests: &f.store };
        let req = uc
            .execute(&f.owner, f.request_id, RequestDecision::Reject)
            .await
            .unwrap();
        assert_eq!(req.status, RequestStatus::Rejected);
        let book = BookRepository::get(&f.store, f.book_id).await.unwrap().unwrap();
        assert!(book.is_available);
    }

    #[tokio::test]
    async fn requester_cannot_approve_their_own_request() {
        let f = fixture().await;
        let uc = DecideBookRequest { requests: &f.store };
        let res = uc
            .execute(&f.buyer, f.request_id, RequestDecision::Accept)
            .await;
        assert!(matches!(res, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn second_accept_on_same_listing_fails() {
        let f = fixture().await;
        let third = f.store.seed_user("c@campus.edu", false);
        let other = f.store.seed_request(f.book_id, third.id);
        let uc = DecideBookRequest { requests: &f.store };
        uc.execute(&f.owner, f.request_id, RequestDecision::Accept)
            .await
            .unwrap();
        let res = uc.execute(&f.owner, other.id, RequestDecision::Accept).await;
        assert!(matches!(res, Err(AppError::Invalid(m)) if m.contains("no longer available")));
    }

    #[tokio::test]
    async fn accepted_requests_cannot_be_rejected() {
        let f = fixture().await;
        let uc = DecideBookRequest { requests: &f.store };
        uc.execute(&f.owner, f.request_id, RequestDecision::Accept)
            .await
            .unwrap();
        let res = uc
            .execute(&f.owner, f.request_id, RequestDecision::Reject)
            .await;
        assert!(matches!(res, Err(AppError::Invalid(m)) if m.contains("pending")));
    }
}
