use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::application::access::OwnerRef;
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::storage_port::StoredBlob;
use crate::domain::attachments::image::{Image, ImageParent};
use crate::infrastructure::db::PgPool;

struct Tables {
    images: &'static str,
    parent: &'static str,
    owner_column: &'static str,
}

fn tables(parent: ImageParent) -> Tables {
    match parent {
        ImageParent::Book => Tables {
            images: "book_images",
            parent: "book_posts",
            owner_column: "posted_by",
        },
        ImageParent::Event => Tables {
            images: "event_images",
            parent: "events",
            owner_column: "organizer",
        },
        ImageParent::Roommate => Tables {
            images: "roommate_images",
            parent: "roommate_posts",
            owner_column: "user_id",
        },
    }
}

fn owner_ref(parent: ImageParent, owner: Uuid) -> OwnerRef {
    match parent {
        ImageParent::Book => OwnerRef::PostedBy(owner),
        ImageParent::Event => OwnerRef::Organizer(owner),
        ImageParent::Roommate => OwnerRef::User(owner),
    }
}

fn map_image(r: &PgRow) -> Image {
    Image {
        id: r.get("id"),
        parent_id: r.get("parent_id"),
        storage_key: r.get("storage_key"),
        size_bytes: r.get("size_bytes"),
        content_hash: r.get("content_hash"),
        is_primary: r.get("is_primary"),
        uploaded_at: r.get("uploaded_at"),
    }
}

/// Locks the image's parent row, the same lock `add` takes first, and
/// returns the parent id once the image is known to still exist under it.
async fn lock_parent_of(
    tx: &mut Transaction<'_, Postgres>,
    t: &Tables,
    image_id: Uuid,
) -> anyhow::Result<Option<Uuid>> {
    let row = sqlx::query(&format!("SELECT parent_id FROM {} WHERE id = $1", t.images))
        .bind(image_id)
        .fetch_optional(&mut **tx)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let parent_id: Uuid = row.get("parent_id");
    sqlx::query(&format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", t.parent))
        .bind(parent_id)
        .execute(&mut **tx)
        .await?;
    let still_there = sqlx::query(&format!(
        "SELECT 1 AS one FROM {} WHERE id = $1 AND parent_id = $2",
        t.images
    ))
    .bind(image_id)
    .bind(parent_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(still_there.map(|_| parent_id))
}

pub struct SqlxImageRepository {
    pub pool: PgPool,
}

impl SqlxImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for SqlxImageRepository {
    async fn parent_owner(
        &self,
        parent: ImageParent,
        parent_id: Uuid,
    ) -> anyhow::Result<Option<OwnerRef>> {
        let t = tables(parent);
        let sql = format!("SELECT {} AS owner FROM {} WHERE id = $1", t.owner_column, t.parent);
        let row = sqlx::query(&sql)
            .bind(parent_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| owner_ref(parent, r.get("owner"))))
    }

    async fn list(&self, parent: ImageParent, parent_id: Uuid) -> anyhow::Result<Vec<Image>> {
        self.list_for_parents(parent, &[parent_id]).await
    }

    async fn list_for_parents(
        &self,
        parent: ImageParent,
        parent_ids: &[Uuid],
    ) -> anyhow::Result<Vec<Image>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, parent_id, storage_key, size_bytes, content_hash, is_primary, uploaded_at FROM {}
             WHERE parent_id = ANY($1)
             ORDER BY is_primary DESC, uploaded_at ASC",
            tables(parent).images
        );
        let rows = sqlx::query(&sql)
            .bind(parent_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_image).collect())
    }

    async fn get(&self, parent: ImageParent, image_id: Uuid) -> anyhow::Result<Option<Image>> {
        let sql = format!(
            "SELECT id, parent_id, storage_key, size_bytes, content_hash, is_primary, uploaded_at
             FROM {} WHERE id = $1",
            tables(parent).images
        );
        let row = sqlx::query(&sql)
            .bind(image_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_image))
    }

    async fn add(
        &self,
        parent: ImageParent,
        parent_id: Uuid,
        blob: &StoredBlob,
        promote: bool,
    ) -> anyhow::Result<Image> {
        let t = tables(parent);
        let mut tx = self.pool.begin().await?;
        let locked = sqlx::query(&format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", t.parent))
            .bind(parent_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            anyhow::bail!("{} {} does not exist", t.parent, parent_id);
        }
        let existing: i64 = sqlx::query(&format!(
            "SELECT COUNT(*)::BIGINT AS n FROM {} WHERE parent_id = $1",
            t.images
        ))
        .bind(parent_id)
        .fetch_one(&mut *tx)
        .await?
        .get("n");
        let is_primary = existing == 0 || promote;
        if is_primary {
            sqlx::query(&format!(
                "UPDATE {} SET is_primary = false WHERE parent_id = $1 AND is_primary",
                t.images
            ))
            .bind(parent_id)
            .execute(&mut *tx)
            .await?;
        }
        let row = sqlx::query(&format!(
            "INSERT INTO {} (parent_id, storage_key, size_bytes, content_hash, is_primary)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, parent_id, storage_key, size_bytes, content_hash, is_primary, uploaded_at",
            t.images
        ))
        .bind(parent_id)
        .bind(&blob.key)
        .bind(blob.size)
        .bind(&blob.content_hash)
        .bind(is_primary)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(map_image(&row))
    }

    async fn set_primary(
        &self,
        parent: ImageParent,
        image_id: Uuid,
    ) -> anyhow::Result<Option<Image>> {
        let t = tables(parent);
        let mut tx = self.pool.begin().await?;
        let Some(parent_id) = lock_parent_of(&mut tx, &t, image_id).await? else {
            return Ok(None);
        };
        sqlx::query(&format!(
            "UPDATE {} SET is_primary = false WHERE parent_id = $1 AND is_primary AND id <> $2",
            t.images
        ))
        .bind(parent_id)
        .bind(image_id)
        .execute(&mut *tx)
        .await?;
        let row = sqlx::query(&format!(
            "UPDATE {} SET is_primary = true WHERE id = $1
             RETURNING id, parent_id, storage_key, size_bytes, content_hash, is_primary, uploaded_at",
            t.images
        ))
        .bind(image_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(map_image(&row)))
    }

    async fn remove(&self, parent: ImageParent, image_id: Uuid) -> anyhow::Result<Option<Image>> {
        let t = tables(parent);
        let mut tx = self.pool.begin().await?;
        if lock_parent_of(&mut tx, &t, image_id).await?.is_none() {
            return Ok(None);
        }
        let row = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1
             RETURNING id, parent_id, storage_key, size_bytes, content_hash, is_primary, uploaded_at",
            t.images
        ))
        .bind(image_id)
        .fetch_one(&mut *tx)
        .await?;
        let removed = map_image(&row);
        if removed.is_primary {
            sqlx::query(&format!(
                "UPDATE {images} SET is_primary = true
                 WHERE id = (SELECT id FROM {images} WHERE parent_id = $1
                             ORDER BY uploaded_at ASC, id ASC LIMIT 1)",
                images = t.images
            ))
            .bind(removed.parent_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(Some(removed))
    }

    async fn keys_owned_by(&self, user_id: Uuid) -> anyhow::Result<Vec<String>> {
        let rows = sqlx::query(
            r#"SELECT i.storage_key FROM book_images i JOIN book_posts p ON p.id = i.parent_id WHERE p.posted_by = $1
               UNION ALL
               SELECT i.storage_key FROM event_images i JOIN events e ON e.id = i.parent_id WHERE e.organizer = $1
               UNION ALL
               SELECT i.storage_key FROM roommate_images i JOIN roommate_posts r ON r.id = i.parent_id WHERE r.user_id = $1"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.get("storage_key")).collect())
    }
}
