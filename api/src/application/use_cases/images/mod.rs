pub mod delete_image;
pub mod list_images;
pub mod set_primary;
pub mod upload_image;

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    /// Make this the gallery's primary image even if one exists.
    pub promote: bool,
}

impl ImageUpload {
    /// Accepts declared `image/*` content or a filename with an image extension.
    pub fn looks_like_image(&self) -> bool {
        if let Some(ct) = self.content_type.as_deref() {
            if ct.starts_with("image/") {
                return true;
            }
        }
        self.filename
            .as_deref()
            .and_then(|name| mime_guess::from_path(name).first())
            .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
            .unwrap_or(false)
    }
}
