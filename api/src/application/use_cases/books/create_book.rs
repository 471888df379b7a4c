use crate::application::dto::books::{BookDto, BookInput};
use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::book_repository::{BookRepository, NewBook};
use crate::application::use_cases::common::{clean, non_negative, require_text};
use crate::domain::accounts::user::User;

pub struct CreateBook<'a, B: BookRepository + ?Sized> {
    pub books: &'a B,
}

impl<'a, B: BookRepository + ?Sized> CreateBook<'a, B> {
    pub async fn execute(&self, poster: &User, input: BookInput) -> Result<BookDto, AppError> {
        let mut errors = FieldErrors::new();
        let title = require_text(&mut errors, "title", &input.title);
        let author = require_text(&mut errors, "author", &input.author);
        let department = require_text(&mut errors, "department", &input.department);
        non_negative(&mut errors, "price", input.price);
        let isbn = clean(input.isbn);
        if let Some(isbn) = isbn.as_deref() {
            if self.books.isbn_in_use(isbn, None).await? {
                errors.add("isbn", "book post with this isbn already exists.");
            }
        }
        errors.into_result()?;

        let book = self
            .books
            .create(&NewBook {
                title,
                author,
                isbn,
                description: clean(input.description),
                condition: input.condition.unwrap_or_default(),
                price: input.price,
                transaction_type: input.transaction_type.unwrap_or_default(),
                department,
                course_code: clean(input.course_code),
                posted_by: poster.id,
                contact_email: clean(input.contact_email).unwrap_or_else(|| poster.email.clone()),
                contact_phone: clean(input.contact_phone),
            })
            .await?;
        tracing::info!(book_id = %book.id, posted_by = %poster.id, "book_posted");
        Ok(BookDto {
            book,
            images: Vec::new(),
        })
    }
}
