use crate::application::access::Identity;
use crate::application::error::AppError;
use crate::application::ports::book_request_repository::BookRequestRepository;
use crate::domain::bookbank::request::BookRequestDetail;

/// Requests the caller made plus those addressed to their listings.
/// Staff see every request.
pub struct ListBookRequests<'a, R: BookRequestRepository + ?Sized> {
    pub requests: &'a R,
}

impl<'a, R: BookRequestRepository + ?Sized> ListBookRequests<'a, R> {
    pub async fn execute(&self, identity: &Identity) -> Result<Vec<BookRequestDetail>, AppError> {
        let rows = if identity.is_staff {
            self.requests.list_all().await?
        } else {
            self.requests.list_for_user(identity.id).await?
        };
        Ok(rows)
    }
}
