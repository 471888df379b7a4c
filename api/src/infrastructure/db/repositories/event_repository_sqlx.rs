use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::event_repository::{
    EventCounts, EventFilter, EventRepository, EventVisibility, NewEvent,
};
use crate::domain::noticeboard::event::Event;
use crate::infrastructure::db::PgPool;

pub(crate) const EVENT_COLUMNS: &str = "id, title, description, event_type, start_datetime, end_datetime, location, location_url, organizer, is_online, meeting_link, max_participants, is_free, price, registration_required, registration_deadline, is_approved, created_at, updated_at";

pub struct SqlxEventRepository {
    pub pool: PgPool,
}

impl SqlxEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn map_event(r: &PgRow) -> anyhow::Result<Event> {
    Ok(Event {
        id: r.get("id"),
        title: r.get("title"),
        description: r.get("description"),
        event_type: r.get::<String, _>("event_type").parse()?,
        start_datetime: r.get("start_datetime"),
        end_datetime: r.get("end_datetime"),
        location: r.get("location"),
        location_url: r.get("location_url"),
        organizer: r.get("organizer"),
        is_online: r.get("is_online"),
        meeting_link: r.get("meeting_link"),
        max_participants: r.get("max_participants"),
        is_free: r.get("is_free"),
        price: r.get("price"),
        registration_required: r.get("registration_required"),
        registration_deadline: r.get("registration_deadline"),
        is_approved: r.get("is_approved"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

#[async_trait]
impl EventRepository for SqlxEventRepository {
    async fn list(&self, filter: &EventFilter) -> anyhow::Result<Vec<Event>> {
        // $1 = approved-only flag, $2 = organizer allowed to see their pending events
        let (approved_only, organizer) = match filter.visibility {
            EventVisibility::All => (false, None),
            EventVisibility::ApprovedOnly => (true, None),
            EventVisibility::ApprovedOrOrganizedBy(user) => (true, Some(user)),
        };
        let like = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE (NOT $1 OR is_approved OR organizer = $2)
               AND ($3::BOOL IS NULL OR (start_datetime > $4) = $3)
               AND ($5::BOOL IS NULL OR (end_datetime < $4) = $5)
               AND ($6::TEXT IS NULL OR event_type = $6)
               AND ($7::BOOL IS NULL OR is_online = $7)
               AND ($8::BOOL IS NULL OR is_free = $8)
               AND ($9::BOOL IS NULL OR registration_required = $9)
               AND ($10::BOOL IS NULL OR is_approved = $10)
               AND ($11::DATE IS NULL OR start_datetime::DATE >= $11)
               AND ($12::DATE IS NULL OR end_datetime::DATE <= $12)
               AND ($13::TEXT IS NULL OR title ILIKE $13 OR description ILIKE $13 OR location ILIKE $13)
             ORDER BY start_datetime ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(approved_only)
            .bind(organizer)
            .bind(filter.is_upcoming)
            .bind(filter.now)
            .bind(filter.is_past)
            .bind(filter.event_type.map(|t| t.as_str()))
            .bind(filter.is_online)
            .bind(filter.is_free)
            .bind(filter.registration_required)
            .bind(filter.is_approved)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(like)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_event).collect()
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_event).transpose()
    }

    async fn create(&self, event: &NewEvent) -> anyhow::Result<Event> {
        let sql = format!(
            "INSERT INTO events (title, description, event_type, start_datetime, end_datetime, location,
                                 location_url, organizer, is_online, meeting_link, max_participants,
                                 is_free, price, registration_required, registration_deadline, is_approved)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.event_type.as_str())
            .bind(event.start_datetime)
            .bind(event.end_datetime)
            .bind(&event.location)
            .bind(&event.location_url)
            .bind(event.organizer)
            .bind(event.is_online)
            .bind(&event.meeting_link)
            .bind(event.max_participants)
            .bind(event.is_free)
            .bind(event.price)
            .bind(event.registration_required)
            .bind(event.registration_deadline)
            .bind(event.is_approved)
            .fetch_one(&self.pool)
            .await?;
        map_event(&row)
    }

    async fn update(&self, event: &Event) -> anyhow::Result<Option<Event>> {
        let sql = format!(
            "UPDATE events SET title = $2, description = $3, event_type = $4, start_datetime = $5,
                    end_datetime = $6, location = $7, location_url = $8, is_online = $9,
                    meeting_link = $10, max_participants = $11, is_free = $12, price = $13,
                    registration_required = $14, registration_deadline = $15, updated_at = now()
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.event_type.as_str())
            .bind(event.start_datetime)
            .bind(event.end_datetime)
            .bind(&event.location)
            .bind(&event.location_url)
            .bind(event.is_online)
            .bind(&event.meeting_link)
            .bind(event.max_participants)
            .bind(event.is_free)
            .bind(event.price)
            .bind(event.registration_required)
            .bind(event.registration_deadline)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_event).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> anyhow::Result<Option<Event>> {
        let sql = format!(
            "UPDATE events SET is_approved = $2, updated_at = now() WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(approved)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_event).transpose()
    }

    async fn counts(&self, id: Uuid) -> anyhow::Result<EventCounts> {
        let row = sqlx::query(
            r#"SELECT
                 (SELECT COUNT(*) FROM event_registrations WHERE event_id = $1)::BIGINT AS total,
                 (SELECT COUNT(*) FROM event_registrations WHERE event_id = $1 AND attended)::BIGINT AS attended,
                 (SELECT COUNT(*) FROM event_comments WHERE event_id = $1)::BIGINT AS comments,
                 (SELECT COUNT(*) FROM event_images WHERE parent_id = $1)::BIGINT AS images"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(EventCounts {
            total_registrations: row.get("total"),
            attended_registrations: row.get("attended"),
            comments: row.get("comments"),
            images: row.get("images"),
        })
    }

    async fn registration_counts(&self, ids: &[Uuid]) -> anyhow::Result<HashMap<Uuid, i64>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query(
            r#"SELECT event_id, COUNT(*)::BIGINT AS n FROM event_registrations
               WHERE event_id = ANY($1) GROUP BY event_id"#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| (r.get("event_id"), r.get("n")))
            .collect())
    }
}
