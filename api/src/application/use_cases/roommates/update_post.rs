use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::dto::roommates::{RoommateChanges, RoommateDto};
use crate::application::error::{AppError, FieldErrors};
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::roommate_repository::RoommateRepository;
use crate::application::use_cases::common::{clean, clean_change, non_negative, require_text};
use crate::application::use_cases::roommates::{check_terms, with_images};

pub struct UpdateRoommatePost<'a, R, I>
where
    R: RoommateRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub posts: &'a R,
    pub images: &'a I,
}

impl<'a, R, I> UpdateRoommatePost<'a, R, I>
where
    R: RoommateRepository + ?Sized,
    I: ImageRepository + ?Sized,
{
    pub async fn execute(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: RoommateChanges,
    ) -> Result<RoommateDto, AppError> {
        let mut post = self
            .posts
            .get(id)
            .await?
            .ok_or(AppError::NotFound("roommate post"))?;
        access::require_owner(identity, &post)?;

        let mut errors = FieldErrors::new();
        if let Some(v) = changes.title {
            post.title = require_text(&mut errors, "title", &v);
        }
        if let Some(v) = changes.description {
            post.description = require_text(&mut errors, "description", &v);
        }
        if let Some(v) = changes.location {
            post.location = require_text(&mut errors, "location", &v);
        }
        if let Some(v) = changes.contact_number {
            post.contact_number = require_text(&mut errors, "contact_number", &v);
        }
        if let Some(v) = changes.contact_email {
            match clean(Some(v)) {
                Some(email) => post.contact_email = email,
                None => errors.add("contact_email", "This field may not be blank."),
            }
        }
        if let Some(v) = changes.rent {
            non_negative(&mut errors, "rent", Some(v));
            post.rent = v;
        }
        if let Some(v) = changes.available_from {
            post.available_from = v;
        }
        if let Some(v) = changes.lease_duration {
            post.lease_duration = v;
        }
        if let Some(v) = changes.room_type {
            post.room_type = v;
        }
        if let Some(v) = changes.preferred_gender {
            post.preferred_gender = v;
        }
        if let Some(v) = changes.current_occupants {
            post.current_occupants = v;
        }
        if let Some(v) = changes.total_occupants {
            post.total_occupants = v;
        }
        let a = &mut post.amenities;
        for (slot, change) in [
            (&mut a.has_furniture, changes.has_furniture),
            (&mut a.has_parking, changes.has_parking),
            (&mut a.has_laundry, changes.has_laundry),
            (&mut a.has_kitchen, changes.has_kitchen),
            (&mut a.has_wifi, changes.has_wifi),
            (&mut a.is_pets_allowed, changes.is_pets_allowed),
            (&mut a.is_smoking_allowed, changes.is_smoking_allowed),
        ] {
            if let Some(v) = change {
                *slot = v;
            }
        }
        if let Some(v) = changes.occupation {
            post.occupation = v;
        }
        if let Some(v) = clean_change(changes.university) {
            post.university = v;
        }
        if let Some(v) = changes.is_active {
            post.is_active = v;
        }
        check_terms(
            &mut errors,
            post.current_occupants,
            post.total_occupants,
            post.lease_duration,
        );
        errors.into_result()?;

        let post = self
            .posts
            .update(&post)
            .await?
            .ok_or(AppError::NotFound("roommate post"))?;
        with_images(self.images, vec![post])
            .await?
            .pop()
            .ok_or(AppError::NotFound("roommate post"))
    }
}
