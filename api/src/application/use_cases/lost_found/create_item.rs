use chrono::Utc;

use crate::application::access::Identity;
use crate::application::dto::lost_found::ItemInput;
use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::lost_found_repository::{LostFoundRepository, NewItem};
use crate::application::use_cases::common::{clean, require_text};
use crate::domain::lostfound::item::{LostFoundItem, stamp_occurred};

pub struct CreateItem<'a, R: LostFoundRepository + ?Sized> {
    pub items: &'a R,
}

impl<'a, R: LostFoundRepository + ?Sized> CreateItem<'a, R> {
    pub async fn execute(
        &self,
        identity: &Identity,
        input: ItemInput,
    ) -> Result<LostFoundItem, AppError> {
        let mut errors = FieldErrors::new();
        let item_name = require_text(&mut errors, "item_name", &input.item_name);
        errors.into_result()?;

        let status = input.status.unwrap_or_default();
        let item = self
            .items
            .create(&NewItem {
                item_name,
                description: clean(input.description),
                status,
                location: clean(input.location),
                date_occurred: stamp_occurred(status, input.date_occurred, Utc::now()),
                reporter: identity.id,
                contact_info: clean(input.contact_info),
                category: clean(input.category),
                color: clean(input.color),
                brand: clean(input.brand),
            })
            .await?;
        tracing::info!(item_id = %item.id, status = %item.status, "item_reported");
        Ok(item)
    }
}
