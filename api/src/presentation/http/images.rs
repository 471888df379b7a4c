use axum::{Json, extract::Multipart, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::access::Identity;
use crate::application::error::AppError;
use crate::application::use_cases::images::ImageUpload;
use crate::application::use_cases::images::delete_image::DeleteImage;
use crate::application::use_cases::images::list_images::ListImages;
use crate::application::use_cases::images::set_primary::SetPrimaryImage;
use crate::application::use_cases::images::upload_image::UploadImage;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::accounts::user::User;
use crate::domain::attachments::image::{Image, ImageParent};
use crate::presentation::http::extract::parse_flag;

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageResponse {
    pub id: Uuid,
    /// Public URL of the stored bytes.
    pub image: String,
    pub size: i64,
    /// Hex sha256 of the stored bytes.
    pub content_hash: String,
    pub is_primary: bool,
    pub uploaded_at: DateTime<Utc>,
}

impl ImageResponse {
    pub fn from_image(cfg: &Config, image: &Image) -> Self {
        Self {
            id: image.id,
            image: cfg.upload_url(&image.storage_key),
            size: image.size_bytes,
            content_hash: image.content_hash.clone(),
            is_primary: image.is_primary,
            uploaded_at: image.uploaded_at,
        }
    }

    pub fn gallery(cfg: &Config, images: &[Image]) -> Vec<Self> {
        images.iter().map(|i| Self::from_image(cfg, i)).collect()
    }

    pub fn primary_url(cfg: &Config, images: &[Image]) -> Option<String> {
        images
            .iter()
            .find(|i| i.is_primary)
            .map(|i| cfg.upload_url(&i.storage_key))
    }
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImageUploadForm {
    /// Image file
    #[schema(value_type = String, format = Binary)]
    image: String,
    /// Make this the primary image
    is_primary: Option<bool>,
}

/// Reads the `image` file part (and optional `is_primary` flag) from a
/// multipart body. Returns `None` when no file part was sent.
pub async fn read_image_part(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<ImageUpload>, AppError> {
    let mut upload: Option<ImageUpload> = None;
    let mut promote = false;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid(e.body_text()))?
    {
        match field.name() {
            Some("image") => {
                let filename = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::invalid(e.body_text()))?;
                if data.len() > max_bytes {
                    return Err(AppError::field(
                        "image",
                        format!("Ensure the file is at most {max_bytes} bytes."),
                    ));
                }
                upload = Some(ImageUpload {
                    filename,
                    content_type,
                    bytes: data.to_vec(),
                    promote: false,
                });
            }
            Some("is_primary") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::invalid(e.body_text()))?;
                promote = parse_flag(Some(&text)).unwrap_or(false);
            }
            _ => {}
        }
    }
    Ok(upload.map(|u| ImageUpload { promote, ..u }))
}

pub async fn require_image_part(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<ImageUpload, AppError> {
    read_image_part(multipart, max_bytes)
        .await?
        .ok_or_else(|| AppError::field("image", "No file was submitted."))
}

pub(crate) async fn list_gallery(
    ctx: &AppContext,
    parent: ImageParent,
    parent_id: Uuid,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    let images = ctx.image_repo();
    let list = ListImages {
        images: images.as_ref(),
    }
    .execute(parent, parent_id)
    .await?;
    Ok(Json(ImageResponse::gallery(&ctx.cfg, &list)))
}

pub(crate) async fn upload_to_gallery(
    ctx: &AppContext,
    user: &User,
    parent: ImageParent,
    parent_id: Uuid,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImageResponse>), AppError> {
    let upload = require_image_part(&mut multipart, ctx.cfg.upload_max_bytes).await?;
    let images = ctx.image_repo();
    let storage = ctx.storage_port();
    let image = UploadImage {
        images: images.as_ref(),
        storage: storage.as_ref(),
    }
    .execute(&Identity::from_user(user), parent, parent_id, upload)
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(ImageResponse::from_image(&ctx.cfg, &image)),
    ))
}

pub(crate) async fn delete_from_gallery(
    ctx: &AppContext,
    user: &User,
    parent: ImageParent,
    image_id: Uuid,
) -> Result<StatusCode, AppError> {
    let images = ctx.image_repo();
    let storage = ctx.storage_port();
    DeleteImage {
        images: images.as_ref(),
        storage: storage.as_ref(),
    }
    .execute(&Identity::from_user(user), parent, image_id)
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn promote_in_gallery(
    ctx: &AppContext,
    user: &User,
    parent: ImageParent,
    image_id: Uuid,
) -> Result<Json<ImageResponse>, AppError> {
    let images = ctx.image_repo();
    let image = SetPrimaryImage {
        images: images.as_ref(),
    }
    .execute(&Identity::from_user(user), parent, image_id)
    .await?;
    Ok(Json(ImageResponse::from_image(&ctx.cfg, &image)))
}
