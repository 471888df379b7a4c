use uuid::Uuid;

use crate::application::access::Identity;
use crate::application::error::AppError;
use crate::application::ports::book_repository::BookRepository;
use crate::application::ports::book_request_repository::BookRequestRepository;
use crate::application::use_cases::common::clean;
use crate::domain::bookbank::request::BookRequest;

const DUPLICATE_REQUEST: &str = "You have already requested this book.";

pub struct RequestBook<'a, B, R>
where
    B: BookRepository + ?Sized,
    R: BookRequestRepository + ?Sized,
{
    pub books: &'a B,
    pub requests: &'a R,
}

impl<'a, B, R> RequestBook<'a, B, R>
where
    B: BookRepository + ?Sized,
    R: BookRequestRepository + ?Sized,
{
    pub async fn execute(
        &self,
        identity: &Identity,
        book_id: Uuid,
        message: Option<String>,
    ) -> Result<BookRequest, AppError> {
        let book = self
            .books
            .get(book_id)
            .await?
            .ok_or(AppError::NotFound("book"))?;
        if book.posted_by == identity.id {
            return Err(AppError::invalid("You cannot request your own book."));
        }
        if !book.is_available {
            return Err(AppError::invalid("This book is no longer available."));
        }
        if self.requests.exists(book_id, identity.id).await? {
            return Err(AppError::invalid(DUPLICATE_REQUEST));
        }
        let message = clean(message);
        // The unique (book, requester) constraint settles concurrent duplicates.
        let request = self
            .requests
            .create(book_id, identity.id, message.as_deref())
            .await?
            .ok_or_else(|| AppError::invalid(DUPLICATE_REQUEST))?;
        tracing::info!(book_id = %book_id, request_id = %request.id, requested_by = %identity.id, "book_requested");
        Ok(request)
    }
}
