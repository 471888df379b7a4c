use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::roommates::{RoommateChanges, RoommateDto, RoommateInput};
use crate::application::error::AppError;
use crate::application::ports::roommate_repository::RoommateFilter;
use crate::application::use_cases::roommates::create_post::CreateRoommatePost;
use crate::application::use_cases::roommates::delete_post::DeleteRoommatePost;
use crate::application::use_cases::roommates::get_post::GetRoommatePost;
use crate::application::use_cases::roommates::list_posts::ListRoommatePosts;
use crate::application::use_cases::roommates::update_post::UpdateRoommatePost;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::attachments::image::ImageParent;
use crate::domain::roommate::post::{GenderPreference, Occupation, RoomType};
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::extract::{ValidJson, double_option, parse_choice, parse_flag};
use crate::presentation::http::images::{self, ImageResponse, ImageUploadForm};

#[derive(Debug, Serialize, ToSchema)]
pub struct RoommateResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub rent: Decimal,
    pub available_from: NaiveDate,
    pub lease_duration: i32,
    pub room_type: RoomType,
    pub room_type_display: &'static str,
    pub preferred_gender: GenderPreference,
    pub preferred_gender_display: &'static str,
    pub current_occupants: i32,
    pub total_occupants: i32,
    pub has_furniture: bool,
    pub has_parking: bool,
    pub has_laundry: bool,
    pub has_kitchen: bool,
    pub has_wifi: bool,
    pub is_pets_allowed: bool,
    pub is_smoking_allowed: bool,
    pub occupation: Occupation,
    pub occupation_display: &'static str,
    pub university: Option<String>,
    pub contact_number: String,
    pub contact_email: String,
    pub is_active: bool,
    pub images: Vec<ImageResponse>,
    pub primary_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoommateResponse {
    pub fn from_dto(cfg: &Config, dto: RoommateDto) -> Self {
        let p = dto.post;
        let a = p.amenities;
        Self {
            id: p.id,
            user: p.user_id,
            title: p.title,
            description: p.description,
            location: p.location,
            rent: p.rent,
            available_from: p.available_from,
            lease_duration: p.lease_duration,
            room_type: p.room_type,
            room_type_display: p.room_type.label(),
            preferred_gender: p.preferred_gender,
            preferred_gender_display: p.preferred_gender.label(),
            current_occupants: p.current_occupants,
            total_occupants: p.total_occupants,
            has_furniture: a.has_furniture,
            has_parking: a.has_parking,
            has_laundry: a.has_laundry,
            has_kitchen: a.has_kitchen,
            has_wifi: a.has_wifi,
            is_pets_allowed: a.is_pets_allowed,
            is_smoking_allowed: a.is_smoking_allowed,
            occupation: p.occupation,
            occupation_display: p.occupation.label(),
            university: p.university,
            contact_number: p.contact_number,
            contact_email: p.contact_email,
            is_active: p.is_active,
            primary_image: ImageResponse::primary_url(cfg, &dto.images),
            images: ImageResponse::gallery(cfg, &dto.images),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RoommateQuery {
    pub search: Option<String>,
    pub room_type: Option<String>,
    pub preferred_gender: Option<String>,
    pub max_rent: Option<String>,
    pub is_active: Option<String>,
}

impl RoommateQuery {
    fn into_filter(self) -> Result<RoommateFilter, AppError> {
        Ok(RoommateFilter {
            search: self.search,
            room_type: parse_choice("room_type", self.room_type.as_deref())?,
            preferred_gender: parse_choice("preferred_gender", self.preferred_gender.as_deref())?,
            max_rent: parse_choice("max_rent", self.max_rent.as_deref())?,
            is_active: parse_flag(self.is_active.as_deref()),
            user_id: None,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoommateRequest {
    #[validate(length(min = 1, max = 200, message = "This field may not be blank."))]
    pub title: String,
    pub description: String,
    #[validate(length(min = 1, max = 200, message = "This field may not be blank."))]
    pub location: String,
    pub rent: Decimal,
    pub available_from: NaiveDate,
    #[validate(range(min = 1, message = "Ensure this value is greater than or equal to 1."))]
    pub lease_duration: i32,
    pub room_type: RoomType,
    pub preferred_gender: Option<GenderPreference>,
    pub current_occupants: Option<i32>,
    pub total_occupants: Option<i32>,
    pub has_furniture: Option<bool>,
    pub has_parking: Option<bool>,
    pub has_laundry: Option<bool>,
    pub has_kitchen: Option<bool>,
    pub has_wifi: Option<bool>,
    pub is_pets_allowed: Option<bool>,
    pub is_smoking_allowed: Option<bool>,
    pub occupation: Option<Occupation>,
    #[validate(length(max = 200))]
    pub university: Option<String>,
    #[validate(length(min = 1, max = 20, message = "This field may not be blank."))]
    pub contact_number: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub contact_email: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateRoommateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub rent: Option<Decimal>,
    pub available_from: Option<NaiveDate>,
    #[validate(range(min = 1, message = "Ensure this value is greater than or equal to 1."))]
    pub lease_duration: Option<i32>,
    pub room_type: Option<RoomType>,
    pub preferred_gender: Option<GenderPreference>,
    pub current_occupants: Option<i32>,
    pub total_occupants: Option<i32>,
    pub has_furniture: Option<bool>,
    pub has_parking: Option<bool>,
    pub has_laundry: Option<bool>,
    pub has_kitchen: Option<bool>,
    pub has_wifi: Option<bool>,
    pub is_pets_allowed: Option<bool>,
    pub is_smoking_allowed: Option<bool>,
    pub occupation: Option<Occupation>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub university: Option<Option<String>>,
    pub contact_number: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub contact_email: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateRoommateRequest> for RoommateChanges {
    fn from(r: UpdateRoommateRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            location: r.location,
            rent: r.rent,
            available_from: r.available_from,
            lease_duration: r.lease_duration,
            room_type: r.room_type,
            preferred_gender: r.preferred_gender,
            current_occupants: r.current_occupants,
            total_occupants: r.total_occupants,
            has_furniture: r.has_furniture,
            has_parking: r.has_parking,
            has_laundry: r.has_laundry,
            has_kitchen: r.has_kitchen,
            has_wifi: r.has_wifi,
            is_pets_allowed: r.is_pets_allowed,
            is_smoking_allowed: r.is_smoking_allowed,
            occupation: r.occupation,
            university: r.university,
            contact_number: r.contact_number,
            contact_email: r.contact_email,
            is_active: r.is_active,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/roommates", get(list_roommates).post(create_roommate))
        .route(
            "/roommates/:id",
            get(get_roommate)
                .patch(update_roommate)
                .delete(delete_roommate),
        )
        .route(
            "/roommates/:id/images",
            get(list_roommate_images).post(upload_roommate_image),
        )
        .route("/roommates/images/:image_id", delete(delete_roommate_image))
        .route(
            "/roommates/images/:image_id/set-primary",
            post(set_primary_roommate_image),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/roommates", tag = "Roommates", params(RoommateQuery), security(()), responses((status = 200, body = [RoommateResponse])))]
pub async fn list_roommates(
    State(ctx): State<AppContext>,
    Query(q): Query<RoommateQuery>,
) -> Result<Json<Vec<RoommateResponse>>, AppError> {
    let filter = q.into_filter()?;
    let posts = ctx.roommate_repo();
    let images = ctx.image_repo();
    let list = ListRoommatePosts {
        posts: posts.as_ref(),
        images: images.as_ref(),
    }
    .execute(&filter)
    .await?;
    Ok(Json(
        list.into_iter()
            .map(|dto| RoommateResponse::from_dto(&ctx.cfg, dto))
            .collect(),
    ))
}

#[utoipa::path(post, path = "/api/roommates", tag = "Roommates", request_body = CreateRoommateRequest, responses((status = 201, body = RoommateResponse)))]
pub async fn create_roommate(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    ValidJson(req): ValidJson<CreateRoommateRequest>,
) -> Result<(StatusCode, Json<RoommateResponse>), AppError> {
    let posts = ctx.roommate_repo();
    let input = RoommateInput {
        title: req.title,
        description: req.description,
        location: req.location,
        rent: req.rent,
        available_from: req.available_from,
        lease_duration: req.lease_duration,
        room_type: req.room_type,
        preferred_gender: req.preferred_gender,
        current_occupants: req.current_occupants,
        total_occupants: req.total_occupants,
        has_furniture: req.has_furniture,
        has_parking: req.has_parking,
        has_laundry: req.has_laundry,
        has_kitchen: req.has_kitchen,
        has_wifi: req.has_wifi,
        is_pets_allowed: req.is_pets_allowed,
        is_smoking_allowed: req.is_smoking_allowed,
        occupation: req.occupation,
        university: req.university,
        contact_number: req.contact_number,
        contact_email: req.contact_email,
    };
    let dto = CreateRoommatePost {
        posts: posts.as_ref(),
    }
    .execute(&user, input)
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(RoommateResponse::from_dto(&ctx.cfg, dto)),
    ))
}

#[utoipa::path(get, path = "/api/roommates/{id}", tag = "Roommates", params(("id" = Uuid, Path, description = "Post ID")), security(()), responses((status = 200, body = RoommateResponse)))]
pub async fn get_roommate(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoommateResponse>, AppError> {
    let posts = ctx.roommate_repo();
    let images = ctx.image_repo();
    let dto = GetRoommatePost {
        posts: posts.as_ref(),
        images: images.as_ref(),
    }
    .execute(id)
    .await?;
    Ok(Json(RoommateResponse::from_dto(&ctx.cfg, dto)))
}

#[utoipa::path(patch, path = "/api/roommates/{id}", tag = "Roommates", params(("id" = Uuid, Path, description = "Post ID")), request_body = UpdateRoommateRequest, responses((status = 200, body = RoommateResponse)))]
pub async fn update_roommate(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidJson(req): ValidJson<UpdateRoommateRequest>,
) -> Result<Json<RoommateResponse>, AppError> {
    let posts = ctx.roommate_repo();
    let images = ctx.image_repo();
    let dto = UpdateRoommatePost {
        posts: posts.as_ref(),
        images: images.as_ref(),
    }
    .execute(&user.identity(), id, req.into())
    .await?;
    Ok(Json(RoommateResponse::from_dto(&ctx.cfg, dto)))
}

#[utoipa::path(delete, path = "/api/roommates/{id}", tag = "Roommates", params(("id" = Uuid, Path, description = "Post ID")), responses((status = 204)))]
pub async fn delete_roommate(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let posts = ctx.roommate_repo();
    let images = ctx.image_repo();
    let storage = ctx.storage_port();
    DeleteRoommatePost {
        posts: posts.as_ref(),
        images: images.as_ref(),
        storage: storage.as_ref(),
    }
    .execute(&user.identity(), id)
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/roommates/{id}/images", tag = "Roommates", params(("id" = Uuid, Path, description = "Post ID")), security(()), responses((status = 200, body = [ImageResponse])))]
pub async fn list_roommate_images(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    images::list_gallery(&ctx, ImageParent::Roommate, id).await
}

#[utoipa::path(post, path = "/api/roommates/{id}/images", tag = "Roommates", params(("id" = Uuid, Path, description = "Post ID")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses((status = 201, body = ImageResponse)))]
pub async fn upload_roommate_image(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImageResponse>), AppError> {
    images::upload_to_gallery(&ctx, &user, ImageParent::Roommate, id, multipart).await
}

#[utoipa::path(delete, path = "/api/roommates/images/{image_id}", tag = "Roommates", params(("image_id" = Uuid, Path, description = "Image ID")), responses((status = 204)))]
pub async fn delete_roommate_image(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(image_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    images::delete_from_gallery(&ctx, &user, ImageParent::Roommate, image_id).await
}

#[utoipa::path(post, path = "/api/roommates/images/{image_id}/set-primary", tag = "Roommates", params(("image_id" = Uuid, Path, description = "Image ID")), responses((status = 200, body = ImageResponse)))]
pub async fn set_primary_roommate_image(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(image_id): Path<Uuid>,
) -> Result<Json<ImageResponse>, AppError> {
    images::promote_in_gallery(&ctx, &user, ImageParent::Roommate, image_id).await
}
