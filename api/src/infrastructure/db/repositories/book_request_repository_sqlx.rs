use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::book_request_repository::{
    BookRequestRepository, DecisionOutcome,
};
use crate::domain::bookbank::request::{BookRequest, BookRequestDetail, RequestStatus};
use crate::infrastructure::db::PgPool;

const DETAIL_SELECT: &str = r#"SELECT r.id, r.book_id, r.requested_by, r.message, r.status, r.created_at, r.updated_at,
       b.title AS book_title, b.posted_by AS book_owner, b.is_available AS book_available
  FROM book_requests r
  JOIN book_posts b ON b.id = r.book_id"#;

const REQUEST_COLUMNS: &str = "id, book_id, requested_by, message, status, created_at, updated_at";

pub struct SqlxBookRequestRepository {
    pub pool: PgPool,
}

impl SqlxBookRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn decide(&self, id: Uuid, accept: bool) -> anyhow::Result<DecisionOutcome> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT book_id, status FROM book_requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(DecisionOutcome::Missing);
        };
        let status: RequestStatus = row.get::<String, _>("status").parse()?;
        if status != RequestStatus::Pending {
            return Ok(DecisionOutcome::NotPending(status));
        }
        if accept {
            let book_id: Uuid = row.get("book_id");
            // Compare-and-swap on availability: only one accept per listing wins.
            let flipped = sqlx::query(
                "UPDATE book_posts SET is_available = false, updated_at = now()
                 WHERE id = $1 AND is_available",
            )
            .bind(book_id)
            .execute(&mut *tx)
            .await?;
            if flipped.rows_affected() == 0 {
                return Ok(DecisionOutcome::BookUnavailable);
            }
        }
        let next = if accept {
            RequestStatus::Accepted
        } else {
            RequestStatus::Rejected
        };
        let sql = format!(
            "UPDATE book_requests SET status = $2, updated_at = now() WHERE id = $1 RETURNING {REQUEST_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(next.as_str())
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(DecisionOutcome::Applied(map_request(&row)?))
    }
}

fn map_request(r: &PgRow) -> anyhow::Result<BookRequest> {
    Ok(BookRequest {
        id: r.get("id"),
        book_id: r.get("book_id"),
        requested_by: r.get("requested_by"),
        message: r.get("message"),
        status: r.get::<String, _>("status").parse()?,
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

fn map_detail(r: &PgRow) -> anyhow::Result<BookRequestDetail> {
    Ok(BookRequestDetail {
        request: map_request(r)?,
        book_title: r.get("book_title"),
        book_owner: r.get("book_owner"),
        book_available: r.get("book_available"),
    })
}

#[async_trait]
impl BookRequestRepository for SqlxBookRequestRepository {
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<BookRequestDetail>> {
        let sql = format!(
            "{DETAIL_SELECT} WHERE r.requested_by = $1 OR b.posted_by = $1 ORDER BY r.created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_detail).collect()
    }

    async fn list_all(&self) -> anyhow::Result<Vec<BookRequestDetail>> {
        let sql = format!("{DETAIL_SELECT} ORDER BY r.created_at DESC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(map_detail).collect()
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<BookRequestDetail>> {
        let sql = format!("{DETAIL_SELECT} WHERE r.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_detail).transpose()
    }

    async fn exists(&self, book_id: Uuid, requested_by: Uuid) -> anyhow::Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM book_requests WHERE book_id = $1 AND requested_by = $2) AS found",
        )
        .bind(book_id)
        .bind(requested_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("found"))
    }

    async fn create(
        &self,
        book_id: Uuid,
        requested_by: Uuid,
        message: Option<&str>,
    ) -> anyhow::Result<Option<BookRequest>> {
        let sql = format!(
            "INSERT INTO book_requests (book_id, requested_by, message) VALUES ($1, $2, $3)
             ON CONFLICT (book_id, requested_by) DO NOTHING
             RETURNING {REQUEST_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(book_id)
            .bind(requested_by)
            .bind(message)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_request).transpose()
    }

    async fn accept(&self, id: Uuid) -> anyhow::Result<DecisionOutcome> {
        self.decide(id, true).await
    }

    async fn reject(&self, id: Uuid) -> anyhow::Result<DecisionOutcome> {
        self.decide(id, false).await
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM book_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
