use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::lostfound::item::{ItemStatus, LostFoundItem};

#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub status: Option<ItemStatus>,
    pub is_resolved: Option<bool>,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub item_name: String,
    pub description: Option<String>,
    pub status: ItemStatus,
    pub location: Option<String>,
    pub date_occurred: Option<DateTime<Utc>>,
    pub reporter: Uuid,
    pub contact_info: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
}

#[async_trait]
pub trait LostFoundRepository: Send + Sync {
    async fn list(&self, filter: &ItemFilter) -> anyhow::Result<Vec<LostFoundItem>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<LostFoundItem>>;
    async fn create(&self, item: &NewItem) -> anyhow::Result<LostFoundItem>;
    async fn update(&self, item: &LostFoundItem) -> anyhow::Result<Option<LostFoundItem>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    /// `None` unless the item exists and was still `lost`.
    async fn mark_found(&self, id: Uuid, now: DateTime<Utc>)
    -> anyhow::Result<Option<LostFoundItem>>;
    /// `None` unless the item exists and was unclaimed.
    async fn claim(&self, id: Uuid, claimant: Uuid) -> anyhow::Result<Option<LostFoundItem>>;
    /// `None` unless the item is currently claimed by `claimant`.
    async fn unclaim(&self, id: Uuid, claimant: Uuid) -> anyhow::Result<Option<LostFoundItem>>;
    /// Replaces the image key and returns the previous one.
    async fn set_image(&self, id: Uuid, key: Option<&str>) -> anyhow::Result<Option<String>>;
    async fn image_keys_for_reporter(&self, reporter: Uuid) -> anyhow::Result<Vec<String>>;
}
