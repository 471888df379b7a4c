use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::lost_found::{ItemChanges, ItemInput};
use crate::application::error::AppError;
use crate::application::ports::lost_found_repository::ItemFilter;
use crate::application::use_cases::images::ImageUpload;
use crate::application::use_cases::lost_found::claim_item::ClaimItem;
use crate::application::use_cases::lost_found::create_item::CreateItem;
use crate::application::use_cases::lost_found::delete_item::DeleteItem;
use crate::application::use_cases::lost_found::get_item::GetItem;
use crate::application::use_cases::lost_found::item_image::SetItemImage;
use crate::application::use_cases::lost_found::list_items::ListItems;
use crate::application::use_cases::lost_found::mark_found::MarkFound;
use crate::application::use_cases::lost_found::unclaim_item::UnclaimItem;
use crate::application::use_cases::lost_found::update_item::UpdateItem;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::lostfound::item::{ItemStatus, LostFoundItem};
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::extract::{ValidJson, double_option, parse_choice, parse_flag};
use crate::presentation::http::images::{ImageUploadForm, require_image_part};

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub id: Uuid,
    pub item_name: String,
    pub description: Option<String>,
    pub status: ItemStatus,
    pub status_display: &'static str,
    pub location: Option<String>,
    pub date_reported: DateTime<Utc>,
    pub date_occurred: Option<DateTime<Utc>>,
    pub reporter: Uuid,
    pub claimed_by: Option<Uuid>,
    pub is_resolved: bool,
    pub image: Option<String>,
    pub contact_info: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ItemResponse {
    pub fn from_item(cfg: &Config, item: LostFoundItem) -> Self {
        Self {
            id: item.id,
            item_name: item.item_name,
            description: item.description,
            status_display: item.status.label(),
            status: item.status,
            location: item.location,
            date_reported: item.date_reported,
            date_occurred: item.date_occurred,
            reporter: item.reporter,
            claimed_by: item.claimed_by,
            is_resolved: item.is_resolved,
            image: item.image_key.as_deref().map(|k| cfg.upload_url(k)),
            contact_info: item.contact_info,
            category: item.category,
            color: item.color,
            brand: item.brand,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ItemQuery {
    pub status: Option<String>,
    pub is_resolved: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 200, message = "This field may not be blank."))]
    pub item_name: String,
    pub description: Option<String>,
    pub status: Option<ItemStatus>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub date_occurred: Option<DateTime<Utc>>,
    #[validate(length(max = 200))]
    pub contact_info: Option<String>,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate(length(max = 100))]
    pub brand: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub item_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub date_occurred: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contact_info: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub brand: Option<Option<String>>,
}

impl Validate for UpdateItemRequest {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = validator::ValidationErrors::new();
        if self.item_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            let mut err = validator::ValidationError::new("blank");
            err.message = Some("This field may not be blank.".into());
            errors.add("item_name", err);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route("/items/:id/mark_found", post(mark_found))
        .route("/items/:id/claim", post(claim_item))
        .route("/items/:id/unclaim", post(unclaim_item))
        .route("/items/:id/image", put(upload_item_image).delete(clear_item_image))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/items", tag = "Lost & found", params(ItemQuery), security(()), responses((status = 200, body = [ItemResponse])))]
pub async fn list_items(
    State(ctx): State<AppContext>,
    Query(q): Query<ItemQuery>,
) -> Result<Json<Vec<ItemResponse>>, AppError> {
    let filter = ItemFilter {
        status: parse_choice("status", q.status.as_deref())?,
        is_resolved: parse_flag(q.is_resolved.as_deref()),
        category: q.category.filter(|c| !c.trim().is_empty()),
        search: q.search,
    };
    let items = ctx.lost_found_repo();
    let list = ListItems {
        items: items.as_ref(),
    }
    .execute(&filter)
    .await?;
    Ok(Json(
        list.into_iter()
            .map(|i| ItemResponse::from_item(&ctx.cfg, i))
            .collect(),
    ))
}

#[utoipa::path(post, path = "/api/items", tag = "Lost & found", request_body = CreateItemRequest, responses((status = 201, body = ItemResponse)))]
pub async fn create_item(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    ValidJson(req): ValidJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), AppError> {
    let items = ctx.lost_found_repo();
    let item = CreateItem {
        items: items.as_ref(),
    }
    .execute(
        &user.identity(),
        ItemInput {
            item_name: req.item_name,
            description: req.description,
            status: req.status,
            location: req.location,
            date_occurred: req.date_occurred,
            contact_info: req.contact_info,
            category: req.category,
            color: req.color,
            brand: req.brand,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ItemResponse::from_item(&ctx.cfg, item))))
}

#[utoipa::path(get, path = "/api/items/{id}", tag = "Lost & found", params(("id" = Uuid, Path, description = "Item ID")), security(()), responses((status = 200, body = ItemResponse)))]
pub async fn get_item(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse>, AppError> {
    let items = ctx.lost_found_repo();
    let item = GetItem {
        items: items.as_ref(),
    }
    .execute(id)
    .await?;
    Ok(Json(ItemResponse::from_item(&ctx.cfg, item)))
}

#[utoipa::path(patch, path = "/api/items/{id}", tag = "Lost & found", params(("id" = Uuid, Path, description = "Item ID")), request_body = UpdateItemRequest, responses((status = 200, body = ItemResponse)))]
pub async fn update_item(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidJson(req): ValidJson<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, AppError> {
    let changes = ItemChanges {
        item_name: req.item_name,
        description: req.description,
        location: req.location,
        date_occurred: req.date_occurred,
        contact_info: req.contact_info,
        category: req.category,
        color: req.color,
        brand: req.brand,
    };
    let items = ctx.lost_found_repo();
    let item = UpdateItem {
        items: items.as_ref(),
    }
    .execute(&user.identity(), id, changes)
    .await?;
    Ok(Json(ItemResponse::from_item(&ctx.cfg, item)))
}

#[utoipa::path(delete, path = "/api/items/{id}", tag = "Lost & found", params(("id" = Uuid, Path, description = "Item ID")), responses((status = 204)))]
pub async fn delete_item(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let items = ctx.lost_found_repo();
    let storage = ctx.storage_port();
    DeleteItem {
        items: items.as_ref(),
        storage: storage.as_ref(),
    }
    .execute(&user.identity(), id)
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/items/{id}/mark_found", tag = "Lost & found", params(("id" = Uuid, Path, description = "Item ID")), responses((status = 200, body = ItemResponse)))]
pub async fn mark_found(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse>, AppError> {
    let items = ctx.lost_found_repo();
    let item = MarkFound {
        items: items.as_ref(),
    }
    .execute(&user.identity(), id)
    .await?;
    Ok(Json(ItemResponse::from_item(&ctx.cfg, item)))
}

#[utoipa::path(post, path = "/api/items/{id}/claim", tag = "Lost & found", params(("id" = Uuid, Path, description = "Item ID")), responses((status = 200, body = ItemResponse)))]
pub async fn claim_item(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse>, AppError> {
    let items = ctx.lost_found_repo();
    let item = ClaimItem {
        items: items.as_ref(),
    }
    .execute(&user.identity(), id)
    .await?;
    Ok(Json(ItemResponse::from_item(&ctx.cfg, item)))
}

#[utoipa::path(post, path = "/api/items/{id}/unclaim", tag = "Lost & found", params(("id" = Uuid, Path, description = "Item ID")), responses((status = 200, body = ItemResponse)))]
pub async fn unclaim_item(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse>, AppError> {
    let items = ctx.lost_found_repo();
    let item = UnclaimItem {
        items: items.as_ref(),
    }
    .execute(&user.identity(), id)
    .await?;
    Ok(Json(ItemResponse::from_item(&ctx.cfg, item)))
}

#[utoipa::path(put, path = "/api/items/{id}/image", tag = "Lost & found", params(("id" = Uuid, Path, description = "Item ID")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses((status = 200, body = ItemResponse)))]
pub async fn upload_item_image(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ItemResponse>, AppError> {
    let upload = require_image_part(&mut multipart, ctx.cfg.upload_max_bytes).await?;
    set_image(&ctx, &user, id, Some(upload)).await
}

#[utoipa::path(delete, path = "/api/items/{id}/image", tag = "Lost & found", params(("id" = Uuid, Path, description = "Item ID")), responses((status = 200, body = ItemResponse)))]
pub async fn clear_item_image(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse>, AppError> {
    set_image(&ctx, &user, id, None).await
}

async fn set_image(
    ctx: &AppContext,
    user: &CurrentUser,
    id: Uuid,
    upload: Option<ImageUpload>,
) -> Result<Json<ItemResponse>, AppError> {
    let items = ctx.lost_found_repo();
    let storage = ctx.storage_port();
    let item = SetItemImage {
        items: items.as_ref(),
        storage: storage.as_ref(),
    }
    .execute(&user.identity(), id, upload)
    .await?;
    Ok(Json(ItemResponse::from_item(&ctx.cfg, item)))
}
