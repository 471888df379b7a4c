pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;
pub mod request_book;
pub mod update_book;

use std::collections::HashMap;

use uuid::Uuid;

use crate::application::dto::books::BookDto;
use crate::application::ports::image_repository::ImageRepository;
use crate::domain::attachments::image::{Image, ImageParent, sort_gallery};
use crate::domain::bookbank::book::BookPost;

pub(crate) async fn with_images<I: ImageRepository + ?Sized>(
    images: &I,
    books: Vec<BookPost>,
) -> anyhow::Result<Vec<BookDto>> {
    let ids: Vec<Uuid> = books.iter().map(|b| b.id).collect();
    let mut by_parent: HashMap<Uuid, Vec<Image>> = HashMap::new();
    for image in images.list_for_parents(ImageParent::Book, &ids).await? {
        by_parent.entry(image.parent_id).or_default().push(image);
    }
    Ok(books
        .into_iter()
        .map(|book| {
            let mut gallery = by_parent.remove(&book.id).unwrap_or_default();
            sort_gallery(&mut gallery);
            BookDto {
                book,
                images: gallery,
            }
        })
        .collect())
}
