use uuid::Uuid;

use crate::application::access::Identity;
use crate::application::error::AppError;
use crate::application::ports::book_request_repository::BookRequestRepository;
use crate::domain::bookbank::request::BookRequestDetail;

pub struct GetBookRequest<'a, R: BookRequestRepository + ?Sized> {
    pub requests: &'a R,
}

impl<'a, R: BookRequestRepository + ?Sized> GetBookRequest<'a, R> {
    /// Requests outside the caller's view read as missing.
    pub async fn execute(&self, identity: &Identity, id: Uuid) -> Result<BookRequestDetail, AppError> {
        let detail = self
            .requests
            .get(id)
            .await?
            .ok_or(AppError::NotFound("book request"))?;
        let visible = identity.is_staff
            || detail.request.requested_by == identity.id
            || detail.book_owner == identity.id;
        if !visible {
            return Err(AppError::NotFound("book request"));
        }
        Ok(detail)
    }
}
