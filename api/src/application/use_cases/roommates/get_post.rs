use uuid::Uuid;

use crate::application::dto::roommates::RoommateDto;
use crate::application::error::AppError;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::roommate_repository::RoommateRepository;
use crate::application::use_cases::roommates::with_images;

pub struct GetRoommatePost<'a, R, I>
where
    R: RoommateRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub posts: &'a R,
    pub images: &'a I,
}

impl<'a, R, I> GetRoommatePost<'a, R, I>
where
    R: RoommateRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub async fn execute(&self, id: Uuid) -> Result<RoommateDto, AppError> {
        let post = self
            .posts
            .get(id)
            .await?
            .ok_or(AppError::NotFound("roommate post"))?;
        with_images(self.images, vec![post])
            .await?
            .pop()
            .ok_or(AppError::NotFound("roommate post"))
    }
}
