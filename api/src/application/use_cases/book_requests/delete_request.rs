use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::book_request_repository::BookRequestRepository;
use crate::application::use_cases::book_requests::get_request::GetBookRequest;

/// Withdraws a request. Only the requester or staff may do so.
pub struct DeleteBookRequest<'a, R: BookRequestRepository + ?Sized> {
    pub requests: &'a R,
}

impl<'a, R: BookRequestRepository + ?Sized> DeleteBookRequest<'a, R> {
    pub async fn execute(&self, identity: &Identity, id: Uuid) -> Result<(), AppError> {
        let detail = GetBookRequest {
            requests: self.requests,
        }
        .execute(identity, id)
        .await?;
        access::require_owner(identity, &detail.request)?;
        if !self.requests.delete(id).await? {
            return Err(AppError::NotFound("book request"));
        }
        Ok(())
    }
}
