use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::comment_repository::{CommentFilter, CommentRepository};
use crate::domain::noticeboard::comment::EventComment;
use crate::infrastructure::db::PgPool;

const COMMENT_COLUMNS: &str = "id, event_id, user_id, content, created_at, updated_at";

pub struct SqlxCommentRepository {
    pub pool: PgPool,
}

impl SqlxCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_comment(r: &PgRow) -> EventComment {
    EventComment {
        id: r.get("id"),
        event_id: r.get("event_id"),
        user_id: r.get("user_id"),
        content: r.get("content"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn list(&self, filter: &CommentFilter) -> anyhow::Result<Vec<EventComment>> {
        let like = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));
        let rows = sqlx::query(&format!(
            "SELECT {COMMENT_COLUMNS} FROM event_comments
             WHERE ($1::UUID IS NULL OR event_id = $1)
               AND ($2::UUID IS NULL OR user_id = $2)
               AND ($3::TEXT IS NULL OR content ILIKE $3)
             ORDER BY created_at ASC"
        ))
        .bind(filter.event_id)
        .bind(filter.user_id)
        .bind(like)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_comment).collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<EventComment>> {
        let row = sqlx::query(&format!(
            "SELECT {COMMENT_COLUMNS} FROM event_comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_comment))
    }

    async fn create(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> anyhow::Result<EventComment> {
        let row = sqlx::query(&format!(
            "INSERT INTO event_comments (event_id, user_id, content) VALUES ($1, $2, $3)
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(event_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_comment(&row))
    }

    async fn update_content(
        &self,
        id: Uuid,
        content: &str,
    ) -> anyhow::Result<Option<EventComment>> {
        let row = sqlx::query(&format!(
            "UPDATE event_comments SET content = $2, updated_at = now() WHERE id = $1
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_comment))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM event_comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
