use crate::application::error::AppError;
use crate::application::ports::lost_found_repository::{ItemFilter, LostFoundRepository};
use crate::domain::lostfound::item::LostFoundItem;

pub struct ListItems<'a, R: LostFoundRepository + ?Sized> {
    pub items: &'a R,
}

impl<'a, R: LostFoundRepository + ?Sized> ListItems<'a, R> {
    pub async fn execute(&self, filter: &ItemFilter) -> Result<Vec<LostFoundItem>, AppError> {
        Ok(self.items.list(filter).await?)
    }
}
