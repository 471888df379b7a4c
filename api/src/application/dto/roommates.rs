use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::attachments::image::Image;
use crate::domain::roommate::post::{GenderPreference, Occupation, RoomType, RoommatePost};

#[derive(Debug, Clone)]
pub struct RoommateDto {
    pub post: RoommatePost,
    pub images: Vec<Image>,
}

impl RoommateDto {
    pub fn primary_image(&self) -> Option<&Image> {
        self.images.iter().find(|i| i.is_primary)
    }
}

#[derive(Debug, Clone)]
pub struct RoommateInput {
    pub title: String,
    pub description: String,
    pub location: String,
    pub rent: Decimal,
    pub available_from: NaiveDate,
    pub lease_duration: i32,
    pub room_type: RoomType,
    pub preferred_gender: Option<GenderPreference>,
    pub current_occupants: Option<i32>,
    pub total_occupants: Option<i32>,
    pub has_furniture: Option<bool>,
    pub has_parking: Option<bool>,
    pub has_laundry: Option<bool>,
    pub has_kitchen: Option<bool>,
    pub has_wifi: Option<bool>,
    pub is_pets_allowed: Option<bool>,
    pub is_smoking_allowed: Option<bool>,
    pub occupation: Option<Occupation>,
    pub university: Option<String>,
    pub contact_number: String,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RoommateChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub rent: Option<Decimal>,
    pub available_from: Option<NaiveDate>,
    pub lease_duration: Option<i32>,
    pub room_type: Option<RoomType>,
    pub preferred_gender: Option<GenderPreference>,
    pub current_occupants: Option<i32>,
    pub total_occupants: Option<i32>,
    pub has_furniture: Option<bool>,
    pub has_parking: Option<bool>,
    pub has_laundry: Option<bool>,
    pub has_kitchen: Option<bool>,
    pub has_wifi: Option<bool>,
    pub is_pets_allowed: Option<bool>,
    pub is_smoking_allowed: Option<bool>,
    pub occupation: Option<Occupation>,
    pub university: Option<Option<String>>,
    pub contact_number: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: Option<bool>,
}
