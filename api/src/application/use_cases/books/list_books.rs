use crate::application::dto::books::BookDto;
use crate::application::error::AppError;
use crate::application::ports::book_repository::{BookFilter, BookRepository};
use crate::application::ports::image_repository::ImageRepository;
use crate::application::use_cases::books::with_images;

pub struct ListBooks<'a, B, I>
where
    B: BookRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub books: &'a B,
    pub images: &'a I,
}

impl<'a, B, I> ListBooks<'a, B, I>
where
    B: BookRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub async fn execute(&self, filter: &BookFilter) -> Result<Vec<BookDto>, AppError> {
        let books = self.books.list(filter).await?;
        Ok(with_images(self.images, books).await?)
    }
}
