use crate::application::dto::roommates::{RoommateDto, RoommateInput};
use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::roommate_repository::{NewRoommatePost, RoommateRepository};
use crate::application::use_cases::common::{clean, non_negative, require_text};
use crate::application::use_cases::roommates::check_terms;
use crate::domain::accounts::user::User;
use crate::domain::roommate::post::Amenities;

pub struct CreateRoommatePost<'a, R: RoommateRepository + ?Sized> {
    pub posts: &'a R,
}

impl<'a, R: RoommateRepository + ?Sized> CreateRoommatePost<'a, R> {
    pub async fn execute(&self, poster: &User, input: RoommateInput) -> Result<RoommateDto, AppError> {
        let mut errors = FieldErrors::new();
        let title = require_text(&mut errors, "title", &input.title);
        let description = require_text(&mut errors, "description", &input.description);
        let location = require_text(&mut errors, "location", &input.location);
        let contact_number = require_text(&mut errors, "contact_number", &input.contact_number);
        non_negative(&mut errors, "rent", Some(input.rent));
        let current = input.current_occupants.unwrap_or(1);
        let total = input.total_occupants.unwrap_or(2);
        check_terms(&mut errors, current, total, input.lease_duration);
        errors.into_result()?;

        let defaults = Amenities::default();
        let amenities = Amenities {
            has_furniture: input.has_furniture.unwrap_or(defaults.has_furniture),
            has_parking: input.has_parking.unwrap_or(defaults.has_parking),
            has_laundry: input.has_laundry.unwrap_or(defaults.has_laundry),
            has_kitchen: input.has_kitchen.unwrap_or(defaults.has_kitchen),
            has_wifi: input.has_wifi.unwrap_or(defaults.has_wifi),
            is_pets_allowed: input.is_pets_allowed.unwrap_or(defaults.is_pets_allowed),
            is_smoking_allowed: input
                .is_smoking_allowed
                .unwrap_or(defaults.is_smoking_allowed),
        };
        let post = self
            .posts
            .create(&NewRoommatePost {
                user_id: poster.id,
                title,
                description,
                location,
                rent: input.rent,
                available_from: input.available_from,
                lease_duration: input.lease_duration,
                room_type: input.room_type,
                preferred_gender: input.preferred_gender.unwrap_or_default(),
                current_occupants: current,
                total_occupants: total,
                amenities,
                occupation: input.occupation.unwrap_or_default(),
                university: clean(input.university),
                contact_number,
                contact_email: clean(input.contact_email).unwrap_or_else(|| poster.email.clone()),
            })
            .await?;
        tracing::info!(post_id = %post.id, user_id = %poster.id, "roommate_post_created");
        Ok(RoommateDto {
            post,
            images: Vec::new(),
        })
    }
}
