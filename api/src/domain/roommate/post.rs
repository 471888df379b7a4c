use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

choice_enum! {
    pub enum RoomType ("room type") {
        Private => ("private", "Private Room"),
        Shared => ("shared", "Shared Room"),
        Apartment => ("apartment", "Entire Apartment"),
    }
    default = Private;
}

choice_enum! {
    pub enum GenderPreference ("gender preference") {
        Male => ("M", "Male"),
        Female => ("F", "Female"),
        Other => ("O", "Other"),
        Any => ("A", "Any"),
    }
    default = Any;
}

choice_enum! {
    pub enum Occupation ("occupation") {
        Student => ("student", "Student"),
        Working => ("working", "Working Professional"),
        Other => ("other", "Other"),
    }
    default = Student;
}

#[derive(Debug, Clone)]
pub struct RoommatePost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub rent: Decimal,
    pub available_from: NaiveDate,
    pub lease_duration: i32,
    pub room_type: RoomType,
    pub preferred_gender: GenderPreference,
    pub current_occupants: i32,
    pub total_occupants: i32,
    pub amenities: Amenities,
    pub occupation: Occupation,
    pub university: Option<String>,
    pub contact_number: String,
    pub contact_email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amenities {
    pub has_furniture: bool,
    pub has_parking: bool,
    pub has_laundry: bool,
    pub has_kitchen: bool,
    pub has_wifi: bool,
    pub is_pets_allowed: bool,
    pub is_smoking_allowed: bool,
}

impl Default for Amenities {
    fn default() -> Self {
        Self {
            has_furniture: false,
            has_parking: false,
            has_laundry: false,
            has_kitchen: true,
            has_wifi: true,
            is_pets_allowed: false,
            is_smoking_allowed: false,
        }
    }
}
