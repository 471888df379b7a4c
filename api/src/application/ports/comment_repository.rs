use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::noticeboard::comment::EventComment;

#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub event_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub search: Option<String>,
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn list(&self, filter: &CommentFilter) -> anyhow::Result<Vec<EventComment>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<EventComment>>;
    async fn create(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> anyhow::Result<EventComment>;
    async fn update_content(&self, id: Uuid, content: &str)
    -> anyhow::Result<Option<EventComment>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
