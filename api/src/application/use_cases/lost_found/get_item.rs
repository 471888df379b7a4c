use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::lost_found_repository::LostFoundRepository;
use crate::domain::lostfound::item::LostFoundItem;

pub struct GetItem<'a, R: LostFoundRepository + ?Sized> {
    pub items: &'a R,
}

impl<'a, R: LostFoundRepository + ?Sized> GetItem<'a, R> {
    pub async fn execute(&self, id: Uuid) -> Result<LostFoundItem, AppError> {
        self.items
            .get(id)
            .await?
            .ok_or(AppError::NotFound("item"))
    }
}
