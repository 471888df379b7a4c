use crate::application::dto::roommates::RoommateDto;
use crate::application::error::AppError;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::roommate_repository::{RoommateFilter, RoommateRepository};
use crate::application::use_cases::roommates::with_images;

pub struct ListRoommatePosts<'a, R, I>
where
    R: RoommateRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub posts: &'a R,
    pub images: &'a I,
}

impl<'a, R, I> ListRoommatePosts<'a, R, I>
where
    R: RoommateRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub async fn execute(&self, filter: &RoommateFilter) -> Result<Vec<RoommateDto>, AppError> {
        let rows = self.posts.list(filter).await?;
        Ok(with_images(self.images, rows).await?)
    }
}
