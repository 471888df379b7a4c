use uuid::Uuid;

use crate::application::dto::books::BookDto;
use crate::application::error::AppError;
use crate::application::ports::book_repository::BookRepository;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::use_cases::books::with_images;

pub struct GetBook<'a, B, I>
where
    B: BookRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub books: &'a B,
    pub images: &'a I,
}

impl<'a, B, I> GetBook<'a, B, I>
where
    B: BookRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub async fn execute(&self, id: Uuid) -> Result<BookDto, AppError> {
        let book = self
            .books
            .get(id)
            .await?
            .ok_or(AppError::NotFound("book"))?;
        with_images(self.images, vec![book])
            .await?
            .pop()
            .ok_or(AppError::NotFound("book"))
    }
}
