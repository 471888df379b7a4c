use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::roommate::post::{
    Amenities, GenderPreference, Occupation, RoomType, RoommatePost,
};

#[derive(Debug, Clone, Default)]
pub struct RoommateFilter {
    pub search: Option<String>,
    pub room_type: Option<RoomType>,
    pub preferred_gender: Option<GenderPreference>,
    pub max_rent: Option<Decimal>,
    pub is_active: Option<bool>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewRoommatePost {
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
}

#[async_trait]
pub trait RoommateRepository: Send + Sync {
    async fn list(&self, filter: &RoommateFilter) -> anyhow::Result<Vec<RoommatePost>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<RoommatePost>>;
    async fn create(&self, post: &NewRoommatePost) -> anyhow::Result<RoommatePost>;
    async fn update(&self, post: &RoommatePost) -> anyhow::Result<Option<RoommatePost>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
