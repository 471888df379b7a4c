use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::roommate_repository::{
    NewRoommatePost, RoommateFilter, RoommateRepository,
};
use crate::domain::roommate::post::{Amenities, RoommatePost};
use crate::infrastructure::db::PgPool;

const POST_COLUMNS: &str = "id, user_id, title, description, location, rent, available_from, lease_duration, room_type, preferred_gender, current_occupants, total_occupants, has_furniture, has_parking, has_laundry, has_kitchen, has_wifi, is_pets_allowed, is_smoking_allowed, occupation, university, contact_number, contact_email, is_active, created_at, updated_at";

pub struct SqlxRoommateRepository {
    pub pool: PgPool,
}

impl SqlxRoommateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_post(r: &PgRow) -> anyhow::Result<RoommatePost> {
    Ok(RoommatePost {
        id: r.get("id"),
        user_id: r.get("user_id"),
        title: r.get("title"),
        description: r.get("description"),
        location: r.get("location"),
        rent: r.get("rent"),
        available_from: r.get("available_from"),
        lease_duration: r.get("lease_duration"),
        room_type: r.get::<String, _>("room_type").parse()?,
        preferred_gender: r.get::<String, _>("preferred_gender").parse()?,
        current_occupants: r.get("current_occupants"),
        total_occupants: r.get("total_occupants"),
        amenities: Amenities {
            has_furniture: r.get("has_furniture"),
            has_parking: r.get("has_parking"),
            has_laundry: r.get("has_laundry"),
            has_kitchen: r.get("has_kitchen"),
            has_wifi: r.get("has_wifi"),
            is_pets_allowed: r.get("is_pets_allowed"),
            is_smoking_allowed: r.get("is_smoking_allowed"),
        },
        occupation: r.get::<String, _>("occupation").parse()?,
        university: r.get("university"),
        contact_number: r.get("contact_number"),
        contact_email: r.get("contact_email"),
        is_active: r.get("is_active"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

#[async_trait]
impl RoommateRepository for SqlxRoommateRepository {
    async fn list(&self, filter: &RoommateFilter) -> anyhow::Result<Vec<RoommatePost>> {
        let like = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM roommate_posts
             WHERE ($1::TEXT IS NULL OR title ILIKE $1 OR description ILIKE $1 OR location ILIKE $1)
               AND ($2::TEXT IS NULL OR room_type = $2)
               AND ($3::TEXT IS NULL OR preferred_gender = $3)
               AND ($4::NUMERIC IS NULL OR rent <= $4)
               AND ($5::BOOL IS NULL OR is_active = $5)
               AND ($6::UUID IS NULL OR user_id = $6)
             ORDER BY created_at DESC"
        ))
        .bind(like)
        .bind(filter.room_type.map(|t| t.as_str()))
        .bind(filter.preferred_gender.map(|g| g.as_str()))
        .bind(filter.max_rent)
        .bind(filter.is_active)
        .bind(filter.user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_post).collect()
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<RoommatePost>> {
        let row = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM roommate_posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_post).transpose()
    }

    async fn create(&self, post: &NewRoommatePost) -> anyhow::Result<RoommatePost> {
        let a = &post.amenities;
        let row = sqlx::query(&format!(
            "INSERT INTO roommate_posts (user_id, title, description, location, rent, available_from,
                    lease_duration, room_type, preferred_gender, current_occupants, total_occupants,
                    has_furniture, has_parking, has_laundry, has_kitchen, has_wifi, is_pets_allowed,
                    is_smoking_allowed, occupation, university, contact_number, contact_email)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18,
                     $19, $20, $21, $22)
             RETURNING {POST_COLUMNS}"
        ))
        .bind(post.user_id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.location)
        .bind(post.rent)
        .bind(post.available_from)
        .bind(post.lease_duration)
        .bind(post.room_type.as_str())
        .bind(post.preferred_gender.as_str())
        .bind(post.current_occupants)
        .bind(post.total_occupants)
        .bind(a.has_furniture)
        .bind(a.has_parking)
        .bind(a.has_laundry)
        .bind(a.has_kitchen)
        .bind(a.has_wifi)
        .bind(a.is_pets_allowed)
        .bind(a.is_smoking_allowed)
        .bind(post.occupation.as_str())
        .bind(&post.university)
        .bind(&post.contact_number)
        .bind(&post.contact_email)
        .fetch_one(&self.pool)
        .await?;
        map_post(&row)
    }

    async fn update(&self, post: &RoommatePost) -> anyhow::Result<Option<RoommatePost>> {
        let a = &post.amenities;
        let row = sqlx::query(&format!(
            "UPDATE roommate_posts SET title = $2, description = $3, location = $4, rent = $5,
                    available_from = $6, lease_duration = $7, room_type = $8, preferred_gender = $9,
                    current_occupants = $10, total_occupants = $11, has_furniture = $12,
                    has_parking = $13, has_laundry = $14, has_kitchen = $15, has_wifi = $16,
                    is_pets_allowed = $17, is_smoking_allowed = $18, occupation = $19,
                    university = $20, contact_number = $21, contact_email = $22, is_active = $23,
                    updated_at = now()
             WHERE id = $1
             RETURNING {POST_COLUMNS}"
        ))
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.location)
        .bind(post.rent)
        .bind(post.available_from)
        .bind(post.lease_duration)
        .bind(post.room_type.as_str())
        .bind(post.preferred_gender.as_str())
        .bind(post.current_occupants)
        .bind(post.total_occupants)
        .bind(a.has_furniture)
        .bind(a.has_parking)
        .bind(a.has_laundry)
        .bind(a.has_kitchen)
        .bind(a.has_wifi)
        .bind(a.is_pets_allowed)
        .bind(a.is_smoking_allowed)
        .bind(post.occupation.as_str())
        .bind(&post.university)
        .bind(&post.contact_number)
        .bind(&post.contact_email)
        .bind(post.is_active)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_post).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM roommate_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
