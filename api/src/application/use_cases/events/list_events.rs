use crate::application::dto::events::EventDto;
use crate::application::error::AppError;
use crate::application::ports::event_repository::{EventFilter, EventRepository};
use crate::application::ports::image_repository::ImageRepository;
use crate::application::use_cases::events::summarize;

pub struct ListEvents<'a, E, I>
where
    E: EventRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub events: &'a E,
    pub images: &'a I,
}

impl<'a, E, I> ListEvents<'a, E, I>
where
    E: EventRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub async fn execute(&self, filter: &EventFilter) -> Result<Vec<EventDto>, AppError> {
        let rows = self.events.list(filter).await?;
        Ok(summarize(self.events, self.images, rows).await?)
    }
}
