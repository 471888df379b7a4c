use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Kinds of entity that own an image gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageParent {
    Book,
    Event,
    Roommate,
}

impl ImageParent {
    pub fn storage_area(&self) -> &'static str {
        match self {
            ImageParent::Book => "books",
            ImageParent::Event => "events",
            ImageParent::Roommate => "roommates",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Image {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub storage_key: String,
    pub size_bytes: i64,
    /// Hex sha256 of the stored bytes.
    pub content_hash: String,
    pub is_primary: bool,
    pub uploaded_at: DateTime<Utc>,
}

/// Orders a gallery primary first, then by upload time.
pub fn sort_gallery(images: &mut [Image]) {
    images.sort_by(|a, b| {
        b.is_primary
            .cmp(&a.is_primary)
            .then(a.uploaded_at.cmp(&b.uploaded_at))
    });
}

/// Picks the image that takes over as primary in a gallery left without one.
/// Returns `None` when the gallery is empty or still has a primary.
pub fn successor_primary(remaining: &[Image]) -> Option<&Image> {
    if remaining.iter().any(|i| i.is_primary) {
        return None;
    }
    remaining.iter().min_by_key(|i| i.uploaded_at)
}
