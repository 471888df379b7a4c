use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::dto::books::{BookChanges, BookDto};
use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::book_repository::BookRepository;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::use_cases::books::with_images;
use crate::application::use_cases::common::{clean, clean_change, non_negative, require_text};

pub struct UpdateBook<'a, B, I>
where
    B: BookRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub books: &'a B,
    pub images: &'a I,
}

impl<'a, B, I> UpdateBook<'a, B, I>
where
    B: BookRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub async fn execute(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: BookChanges,
    ) -> Result<BookDto, AppError> {
        let mut book = self
            .books
            .get(id)
            .await?
            .ok_or(AppError::NotFound("book"))?;
        access::require_owner(identity, &book)?;

        let mut errors = FieldErrors::new();
        if let Some(title) = changes.title {
            book.title = require_text(&mut errors, "title", &title);
        }
        if let Some(author) = changes.author {
            book.author = require_text(&mut errors, "author", &author);
        }
        if let Some(department) = changes.department {
            book.department = require_text(&mut errors, "department", &department);
        }
        if let Some(isbn) = clean_change(changes.isbn) {
            if let Some(value) = isbn.as_deref() {
                if self.books.isbn_in_use(value, Some(book.id)).await? {
                    errors.add("isbn", "book post with this isbn already exists.");
                }
            }
            book.isbn = isbn;
        }
        if let Some(description) = clean_change(changes.description) {
            book.description = description;
        }
        if let Some(condition) = changes.condition {
            book.condition = condition;
        }
        if let Some(price) = changes.price {
            non_negative(&mut errors, "price", price);
            book.price = price;
        }
        if let Some(tt) = changes.transaction_type {
            book.transaction_type = tt;
        }
        if let Some(course_code) = clean_change(changes.course_code) {
            book.course_code = course_code;
        }
        if let Some(email) = changes.contact_email {
            match clean(Some(email)) {
                Some(email) => book.contact_email = email,
                None => errors.add("contact_email", "This field may not be blank."),
            }
        }
        if let Some(phone) = clean_change(changes.contact_phone) {
            book.contact_phone = phone;
        }
        errors.into_result()?;

        let book = self
            .books
            .update(&book)
            .await?
            .ok_or(AppError::NotFound("book"))?;
        with_images(self.images, vec![book])
            .await?
            .pop()
            .ok_or(AppError::NotFound("book"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryStore;

    #[tokio::test]
    async fn owner_and_staff_may_edit_others_may_not() {
        let store = InMemoryStore::default();
        let owner = store.seed_user("o@campus.edu", false);
        let other = store.seed_user("x@campus.edu", false);
        let staff = store.seed_user("s@campus.edu", true);
        let book = store.seed_book(owner.id);
        let uc = UpdateBook {
            books: &store,
            images: &store,
        };
        let changes = || BookChanges {
            title: Some("Linear Algebra".into()),
            ..Default::default()
        };
        assert!(matches!(
            uc.execute(&Identity::from_user(&other), book.id, changes()).await,
            Err(AppError::Forbidden(_))
        ));
        let dto = uc
            .execute(&Identity::from_user(&owner), book.id, changes())
            .await
            .unwrap();
        assert_eq!(dto.book.title, "Linear Algebra");
        assert!(
            uc.execute(&Identity::from_user(&staff), book.id, changes())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn blank_strings_clear_optional_fields() {
        let store = InMemoryStore::default();
        let owner = store.seed_user("o@campus.edu", false);
        let book = store.seed_book(owner.id);
        let uc = UpdateBook {
            books: &store,
            images: &store,
        };
        let dto = uc
            .execute(
                &Identity::from_user(&owner),
                book.id,
                BookChanges {
                    course_code: Some(Some("  ".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(dto.book.course_code, None);
    }
}
