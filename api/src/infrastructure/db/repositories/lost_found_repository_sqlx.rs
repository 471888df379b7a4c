use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::lost_found_repository::{
    ItemFilter, LostFoundRepository, NewItem,
};
use crate::domain::lostfound::item::{ItemStatus, LostFoundItem};
use crate::infrastructure::db::PgPool;

const ITEM_COLUMNS: &str = "id, item_name, description, status, location, date_reported, date_occurred, reporter, claimed_by, is_resolved, image_key, contact_info, category, color, brand, created_at, updated_at";

pub struct SqlxLostFoundRepository {
    pub pool: PgPool,
}

impl SqlxLostFoundRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_item(r: &PgRow) -> anyhow::Result<LostFoundItem> {
    Ok(LostFoundItem {
        id: r.get("id"),
        item_name: r.get("item_name"),
        description: r.get("description"),
        status: r.get::<String, _>("status").parse()?,
        location: r.get("location"),
        date_reported: r.get("date_reported"),
        date_occurred: r.get("date_occurred"),
        reporter: r.get("reporter"),
        claimed_by: r.get("claimed_by"),
        is_resolved: r.get("is_resolved"),
        image_key: r.get("image_key"),
        contact_info: r.get("contact_info"),
        category: r.get("category"),
        color: r.get("color"),
        brand: r.get("brand"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

#[async_trait]
impl LostFoundRepository for SqlxLostFoundRepository {
    async fn list(&self, filter: &ItemFilter) -> anyhow::Result<Vec<LostFoundItem>> {
        let like = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM lost_found_items
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::BOOL IS NULL OR is_resolved = $2)
               AND ($3::TEXT IS NULL OR category = $3)
               AND ($4::TEXT IS NULL OR item_name ILIKE $4 OR description ILIKE $4 OR location ILIKE $4)
             ORDER BY date_reported DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.is_resolved)
            .bind(&filter.category)
            .bind(like)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_item).collect()
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<LostFoundItem>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM lost_found_items WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_item).transpose()
    }

    async fn create(&self, item: &NewItem) -> anyhow::Result<LostFoundItem> {
        let sql = format!(
            "INSERT INTO lost_found_items (item_name, description, status, location, date_occurred, reporter,
                                           contact_info, category, color, brand)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&item.item_name)
            .bind(&item.description)
            .bind(item.status.as_str())
            .bind(&item.location)
            .bind(item.date_occurred)
            .bind(item.reporter)
            .bind(&item.contact_info)
            .bind(&item.category)
            .bind(&item.color)
            .bind(&item.brand)
            .fetch_one(&self.pool)
            .await?;
        map_item(&row)
    }

    async fn update(&self, item: &LostFoundItem) -> anyhow::Result<Option<LostFoundItem>> {
        let sql = format!(
            "UPDATE lost_found_items SET item_name = $2, description = $3, location = $4,
                    date_occurred = $5, contact_info = $6, category = $7,
                    color = $8, brand = $9, updated_at = now()
             WHERE id = $1
             RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(item.id)
            .bind(&item.item_name)
            .bind(&item.description)
            .bind(&item.location)
            .bind(item.date_occurred)
            .bind(&item.contact_info)
            .bind(&item.category)
            .bind(&item.color)
            .bind(&item.brand)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_item).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM lost_found_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn mark_found(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<LostFoundItem>> {
        let sql = format!(
            "UPDATE lost_found_items
                SET status = $2, is_resolved = true,
                    date_occurred = COALESCE(date_occurred, $3), updated_at = now()
              WHERE id = $1 AND status <> $2
              RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(ItemStatus::Found.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_item).transpose()
    }

    async fn claim(&self, id: Uuid, claimant: Uuid) -> anyhow::Result<Option<LostFoundItem>> {
        let sql = format!(
            "UPDATE lost_found_items SET claimed_by = $2, is_resolved = true, updated_at = now()
              WHERE id = $1 AND claimed_by IS NULL
              RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(claimant)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_item).transpose()
    }

    async fn unclaim(&self, id: Uuid, claimant: Uuid) -> anyhow::Result<Option<LostFoundItem>> {
        let sql = format!(
            "UPDATE lost_found_items SET claimed_by = NULL, is_resolved = false, updated_at = now()
              WHERE id = $1 AND claimed_by = $2
              RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(claimant)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_item).transpose()
    }

    async fn set_image(&self, id: Uuid, key: Option<&str>) -> anyhow::Result<Option<String>> {
        // `previous` is the key held before this update.
        let row = sqlx::query(
            r#"UPDATE lost_found_items n SET image_key = $2, updated_at = now()
                 FROM (SELECT id, image_key FROM lost_found_items WHERE id = $1 FOR UPDATE) o
                WHERE n.id = o.id
                RETURNING o.image_key AS previous"#,
        )
        .bind(id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.and_then(|r| r.get("previous")))
    }

    async fn image_keys_for_reporter(&self, reporter: Uuid) -> anyhow::Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT image_key FROM lost_found_items WHERE reporter = $1 AND image_key IS NOT NULL",
        )
        .bind(reporter)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.get("image_key")).collect())
    }
}
