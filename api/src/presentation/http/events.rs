use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::events::{EventChanges, EventDetailDto, EventDto, EventInput};
use crate::application::error::AppError;
use crate::application::ports::event_repository::EventFilter;
use crate::application::use_cases::comments::list_event_comments::ListEventComments;
use crate::application::use_cases::events::create_event::CreateEvent;
use crate::application::use_cases::events::delete_event::DeleteEvent;
use crate::application::use_cases::events::get_event::GetEvent;
use crate::application::use_cases::events::list_events::ListEvents;
use crate::application::use_cases::events::update_event::UpdateEvent;
use crate::application::use_cases::events::visibility_for;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::attachments::image::ImageParent;
use crate::domain::noticeboard::event::EventType;
use crate::presentation::http::auth::{CurrentUser, MaybeUser};
use crate::presentation::http::comments::{self, CommentContent, CommentResponse};
use crate::presentation::http::extract::{ValidJson, double_option, parse_choice, parse_flag};
use crate::presentation::http::images::{self, ImageResponse, ImageUploadForm};
use crate::presentation::http::registrations::{self, RegistrationResponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub event_type_display: &'static str,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub location: String,
    pub location_url: Option<String>,
    pub organizer: Uuid,
    pub is_online: bool,
    pub meeting_link: Option<String>,
    pub max_participants: Option<i32>,
    pub is_free: bool,
    pub price: Decimal,
    pub registration_required: bool,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub is_approved: bool,
    pub is_upcoming: bool,
    pub is_ongoing: bool,
    pub registrations_count: i64,
    pub images: Vec<ImageResponse>,
    pub primary_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    pub fn from_dto(cfg: &Config, dto: EventDto, now: DateTime<Utc>) -> Self {
        let e = dto.event;
        Self {
            is_upcoming: e.is_upcoming(now),
            is_ongoing: e.is_ongoing(now),
            id: e.id,
            title: e.title,
            description: e.description,
            event_type: e.event_type,
            event_type_display: e.event_type.label(),
            start_datetime: e.start_datetime,
            end_datetime: e.end_datetime,
            location: e.location,
            location_url: e.location_url,
            organizer: e.organizer,
            is_online: e.is_online,
            meeting_link: e.meeting_link,
            max_participants: e.max_participants,
            is_free: e.is_free,
            price: e.price,
            registration_required: e.registration_required,
            registration_deadline: e.registration_deadline,
            is_approved: e.is_approved,
            registrations_count: dto.registrations_count,
            primary_image: ImageResponse::primary_url(cfg, &dto.images),
            images: ImageResponse::gallery(cfg, &dto.images),
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub comments: Vec<CommentResponse>,
    pub registrations: Vec<RegistrationResponse>,
}

impl EventDetailResponse {
    fn from_detail(cfg: &Config, detail: EventDetailDto, now: DateTime<Utc>) -> Self {
        Self {
            event: EventResponse::from_dto(cfg, detail.summary, now),
            comments: detail.comments.into_iter().map(Into::into).collect(),
            registrations: detail.registrations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EventQuery {
    pub is_upcoming: Option<String>,
    pub is_past: Option<String>,
    pub event_type: Option<String>,
    pub is_online: Option<String>,
    pub is_free: Option<String>,
    pub registration_required: Option<String>,
    pub search: Option<String>,
}

impl EventQuery {
    fn apply(self, mut filter: EventFilter) -> Result<EventFilter, AppError> {
        filter.is_upcoming = parse_flag(self.is_upcoming.as_deref());
        filter.is_past = parse_flag(self.is_past.as_deref());
        filter.event_type = parse_choice("event_type", self.event_type.as_deref())?;
        filter.is_online = parse_flag(self.is_online.as_deref());
        filter.is_free = parse_flag(self.is_free.as_deref());
        filter.registration_required = parse_flag(self.registration_required.as_deref());
        filter.search = self.search;
        Ok(filter)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "This field may not be blank."))]
    pub title: String,
    pub description: String,
    pub event_type: Option<EventType>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    #[validate(length(min = 1, max = 255, message = "This field may not be blank."))]
    pub location: String,
    #[validate(url(message = "Enter a valid URL."))]
    pub location_url: Option<String>,
    #[serde(default)]
    pub is_online: bool,
    #[validate(url(message = "Enter a valid URL."))]
    pub meeting_link: Option<String>,
    pub max_participants: Option<i32>,
    pub is_free: Option<bool>,
    pub price: Option<Decimal>,
    #[serde(default)]
    pub registration_required: bool,
    pub registration_deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "This field may not be blank."))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<EventType>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 255, message = "This field may not be blank."))]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub location_url: Option<Option<String>>,
    pub is_online: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub meeting_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub max_participants: Option<Option<i32>>,
    pub is_free: Option<bool>,
    pub price: Option<Decimal>,
    pub registration_required: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub registration_deadline: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EventRegisterRequest {
    pub notes: Option<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/:id",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/events/:id/register", post(register_for_event))
        .route(
            "/events/:id/comments",
            get(list_event_comments).post(create_event_comment),
        )
        .route(
            "/events/:id/images",
            get(list_event_images).post(upload_event_image),
        )
        .route("/events/images/:image_id", delete(delete_event_image))
        .route(
            "/events/images/:image_id/set-primary",
            post(set_primary_event_image),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/events", tag = "Noticeboard", params(EventQuery), security(()), responses((status = 200, body = [EventResponse])))]
pub async fn list_events(
    State(ctx): State<AppContext>,
    caller: MaybeUser,
    Query(q): Query<EventQuery>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let now = Utc::now();
    let identity = caller.identity();
    let filter = q.apply(EventFilter::new(visibility_for(identity.as_ref()), now))?;
    let events = ctx.event_repo();
    let images = ctx.image_repo();
    let list = ListEvents {
        events: events.as_ref(),
        images: images.as_ref(),
    }
    .execute(&filter)
    .await?;
    Ok(Json(
        list.into_iter()
            .map(|dto| EventResponse::from_dto(&ctx.cfg, dto, now))
            .collect(),
    ))
}

#[utoipa::path(post, path = "/api/events", tag = "Noticeboard", request_body = CreateEventRequest, responses((status = 201, body = EventResponse)))]
pub async fn create_event(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    ValidJson(req): ValidJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let events = ctx.event_repo();
    let dto = CreateEvent {
        events: events.as_ref(),
    }
    .execute(
        &user.identity(),
        EventInput {
            title: req.title,
            description: req.description,
            event_type: req.event_type,
            start_datetime: req.start_datetime,
            end_datetime: req.end_datetime,
            location: req.location,
            location_url: req.location_url,
            is_online: req.is_online,
            meeting_link: req.meeting_link,
            max_participants: req.max_participants,
            is_free: req.is_free,
            price: req.price,
            registration_required: req.registration_required,
            registration_deadline: req.registration_deadline,
        },
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(EventResponse::from_dto(&ctx.cfg, dto, Utc::now())),
    ))
}

#[utoipa::path(get, path = "/api/events/{id}", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Event ID")), security(()), responses((status = 200, body = EventDetailResponse)))]
pub async fn get_event(
    State(ctx): State<AppContext>,
    caller: MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventDetailResponse>, AppError> {
    let events = ctx.event_repo();
    let images = ctx.image_repo();
    let comments = ctx.comment_repo();
    let registrations = ctx.registration_repo();
    let detail = GetEvent {
        events: events.as_ref(),
        images: images.as_ref(),
        comments: comments.as_ref(),
        registrations: registrations.as_ref(),
    }
    .execute(id, visibility_for(caller.identity().as_ref()))
    .await?;
    Ok(Json(EventDetailResponse::from_detail(
        &ctx.cfg,
        detail,
        Utc::now(),
    )))
}

#[utoipa::path(patch, path = "/api/events/{id}", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Event ID")), request_body = UpdateEventRequest, responses((status = 200, body = EventResponse)))]
pub async fn update_event(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidJson(req): ValidJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let changes = EventChanges {
        title: req.title,
        description: req.description,
        event_type: req.event_type,
        start_datetime: req.start_datetime,
        end_datetime: req.end_datetime,
        location: req.location,
        location_url: req.location_url,
        is_online: req.is_online,
        meeting_link: req.meeting_link,
        max_participants: req.max_participants,
        is_free: req.is_free,
        price: req.price,
        registration_required: req.registration_required,
        registration_deadline: req.registration_deadline,
    };
    let events = ctx.event_repo();
    let images = ctx.image_repo();
    let dto = UpdateEvent {
        events: events.as_ref(),
        images: images.as_ref(),
    }
    .execute(&user.identity(), id, changes)
    .await?;
    Ok(Json(EventResponse::from_dto(&ctx.cfg, dto, Utc::now())))
}

#[utoipa::path(delete, path = "/api/events/{id}", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Event ID")), responses((status = 204)))]
pub async fn delete_event(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let events = ctx.event_repo();
    let images = ctx.image_repo();
    let storage = ctx.storage_port();
    DeleteEvent {
        events: events.as_ref(),
        images: images.as_ref(),
        storage: storage.as_ref(),
    }
    .execute(&user.identity(), id)
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/events/{id}/register", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Event ID")), request_body = EventRegisterRequest,
    responses((status = 201, body = RegistrationResponse), (status = 200, description = "Already registered", body = RegistrationResponse)))]
pub async fn register_for_event(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<EventRegisterRequest>>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError> {
    let notes = body.and_then(|Json(b)| b.notes);
    registrations::register(&ctx, &user, id, notes).await
}

#[utoipa::path(get, path = "/api/events/{id}/comments", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Event ID")), security(()), responses((status = 200, body = [CommentResponse])))]
pub async fn list_event_comments(
    State(ctx): State<AppContext>,
    caller: MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let events = ctx.event_repo();
    let comments = ctx.comment_repo();
    let list = ListEventComments {
        events: events.as_ref(),
        comments: comments.as_ref(),
    }
    .execute(caller.identity().as_ref(), id)
    .await?;
    Ok(Json(list.into_iter().map(CommentResponse::from).collect()))
}

#[utoipa::path(post, path = "/api/events/{id}/comments", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Event ID")), request_body = CommentContent, responses((status = 201, body = CommentResponse)))]
pub async fn create_event_comment(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidJson(req): ValidJson<CommentContent>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    comments::post_comment(&ctx, &user, id, &req.content).await
}

#[utoipa::path(get, path = "/api/events/{id}/images", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Event ID")), security(()), responses((status = 200, body = [ImageResponse])))]
pub async fn list_event_images(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    images::list_gallery(&ctx, ImageParent::Event, id).await
}

#[utoipa::path(post, path = "/api/events/{id}/images", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Event ID")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses((status = 201, body = ImageResponse)))]
pub async fn upload_event_image(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImageResponse>), AppError> {
    images::upload_to_gallery(&ctx, &user, ImageParent::Event, id, multipart).await
}

#[utoipa::path(delete, path = "/api/events/images/{image_id}", tag = "Noticeboard", params(("image_id" = Uuid, Path, description = "Image ID")), responses((status = 204)))]
pub async fn delete_event_image(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(image_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    images::delete_from_gallery(&ctx, &user, ImageParent::Event, image_id).await
}

#[utoipa::path(post, path = "/api/events/images/{image_id}/set-primary", tag = "Noticeboard", params(("image_id" = Uuid, Path, description = "Image ID")), responses((status = 200, body = ImageResponse)))]
pub async fn set_primary_event_image(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(image_id): Path<Uuid>,
) -> Result<Json<ImageResponse>, AppError> {
    images::promote_in_gallery(&ctx, &user, ImageParent::Event, image_id).await
}
