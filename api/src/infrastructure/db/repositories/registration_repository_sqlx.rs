use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::registration_repository::{
    RegisterOutcome, RegistrationFilter, RegistrationRepository,
};
use crate::domain::noticeboard::registration::EventRegistration;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::event_repository_sqlx::{EVENT_COLUMNS, map_event};

const REGISTRATION_COLUMNS: &str = "id, event_id, user_id, registration_date, attended, notes";

pub struct SqlxRegistrationRepository {
    pub pool: PgPool,
}

impl SqlxRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_registration(r: &PgRow) -> EventRegistration {
    EventRegistration {
        id: r.get("id"),
        event_id: r.get("event_id"),
        user_id: r.get("user_id"),
        registration_date: r.get("registration_date"),
        attended: r.get("attended"),
        notes: r.get("notes"),
    }
}

#[async_trait]
impl RegistrationRepository for SqlxRegistrationRepository {
    async fn register(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<RegisterOutcome> {
        let mut tx = self.pool.begin().await?;
        let event = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE"
        ))
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(event) = event else {
            return Ok(RegisterOutcome::EventMissing);
        };
        let event = map_event(&event)?;

        let existing = sqlx::query(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE event_id = $1 AND user_id = $2"
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        if let Some(row) = existing {
            return Ok(RegisterOutcome::Existing(map_registration(&row)));
        }

        let registered: i64 = sqlx::query(
            "SELECT COUNT(*)::BIGINT AS n FROM event_registrations WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?
        .get("n");
        if let Some(reason) = event.registration_refusal(registered, now) {
            return Ok(RegisterOutcome::Refused(reason));
        }

        let row = sqlx::query(&format!(
            "INSERT INTO event_registrations (event_id, user_id, notes) VALUES ($1, $2, $3)
             RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(event_id)
        .bind(user_id)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(RegisterOutcome::Created(map_registration(&row)))
    }

    async fn list(&self, filter: &RegistrationFilter) -> anyhow::Result<Vec<EventRegistration>> {
        let like = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));
        let rows = sqlx::query(
            r#"SELECT r.id, r.event_id, r.user_id, r.registration_date, r.attended, r.notes
                 FROM event_registrations r
                 JOIN events e ON e.id = r.event_id
                 JOIN users u ON u.id = r.user_id
                WHERE ($1::UUID IS NULL OR r.event_id = $1)
                  AND ($2::UUID IS NULL OR r.user_id = $2)
                  AND ($3::BOOL IS NULL OR r.attended = $3)
                  AND ($4::TEXT IS NULL OR e.title ILIKE $4 OR u.name ILIKE $4 OR u.email ILIKE $4)
                ORDER BY r.registration_date DESC"#,
        )
        .bind(filter.event_id)
        .bind(filter.user_id)
        .bind(filter.attended)
        .bind(like)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_registration).collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<EventRegistration>> {
        let row = sqlx::query(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_registration))
    }

    async fn update(
        &self,
        registration: &EventRegistration,
    ) -> anyhow::Result<Option<EventRegistration>> {
        let row = sqlx::query(&format!(
            "UPDATE event_registrations SET attended = $2, notes = $3 WHERE id = $1
             RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(registration.id)
        .bind(registration.attended)
        .bind(&registration.notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_registration))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM event_registrations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
