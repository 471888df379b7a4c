use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, Query, State},
    http::{StatusCode, request::Parts},
    routing::{delete, get, post},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::access::{self, Identity};
use crate::application::error::AppError;
use crate::application::ports::comment_repository::CommentFilter;
use crate::application::ports::event_repository::{EventFilter, EventVisibility};
use crate::application::use_cases::accounts::list_users::ListUsers;
use crate::application::use_cases::comments::delete_comment::DeleteComment;
use crate::application::use_cases::comments::list_comments::ListComments;
use crate::application::use_cases::events::event_statistics::EventStatistics;
use crate::application::use_cases::events::list_events::ListEvents;
use crate::application::use_cases::events::set_event_approval::SetEventApproval;
use crate::application::use_cases::registrations::list_registrations::ListRegistrations;
use crate::application::use_cases::registrations::mark_attended::MarkAttended;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::AdminEntity;
use crate::domain::accounts::user::User;
use crate::presentation::http::auth::{CurrentUser, UserResponse};
use crate::presentation::http::comments::CommentResponse;
use crate::presentation::http::events::EventResponse;
use crate::presentation::http::extract::{parse_choice, parse_flag};
use crate::presentation::http::registrations::{RegistrationQuery, RegistrationResponse};

/// An authenticated staff account; everyone else gets 401/403.
pub struct StaffUser(pub User);

impl StaffUser {
    pub fn identity(&self) -> Identity {
        Identity::from_user(&self.0)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppContext> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, ctx).await?;
        access::require_staff(&Identity::from_user(&user))?;
        Ok(StaffUser(user))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    fn new(status: &str) -> Json<Self> {
        Json(Self {
            status: status.to_string(),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventStatisticsResponse {
    pub total_registrations: i64,
    pub attended_registrations: i64,
    pub attendance_rate: f64,
    pub comments_count: i64,
    pub images_count: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AdminEventQuery {
    pub is_approved: Option<String>,
    pub event_type: Option<String>,
    pub is_online: Option<String>,
    pub is_free: Option<String>,
    pub registration_required: Option<String>,
    /// Events starting on or after this date (YYYY-MM-DD).
    pub start_date: Option<String>,
    /// Events ending on or before this date (YYYY-MM-DD).
    pub end_date: Option<String>,
    pub search: Option<String>,
}

impl AdminEventQuery {
    fn into_filter(self) -> Result<EventFilter, AppError> {
        let mut filter = EventFilter::new(EventVisibility::All, Utc::now());
        filter.is_approved = parse_flag(self.is_approved.as_deref());
        filter.event_type = parse_choice("event_type", self.event_type.as_deref())?;
        filter.is_online = parse_flag(self.is_online.as_deref());
        filter.is_free = parse_flag(self.is_free.as_deref());
        filter.registration_required = parse_flag(self.registration_required.as_deref());
        filter.start_date = parse_choice::<NaiveDate>("start_date", self.start_date.as_deref())?;
        filter.end_date = parse_choice::<NaiveDate>("end_date", self.end_date.as_deref())?;
        filter.search = self.search;
        Ok(filter)
    }
}

/// Mounts only the admin areas enabled in configuration.
pub fn routes(ctx: AppContext) -> Router {
    let mut router = Router::new();
    for entity in ctx.cfg.admin_entities.clone() {
        router = match entity {
            AdminEntity::Users => router.route("/admin/users", get(admin_list_users)),
            AdminEntity::Events => router
                .route("/admin/events", get(admin_list_events))
                .route("/admin/events/:id/approve", post(admin_approve_event))
                .route("/admin/events/:id/reject", post(admin_reject_event))
                .route("/admin/events/:id/statistics", get(admin_event_statistics)),
            AdminEntity::Comments => router
                .route("/admin/comments", get(admin_list_comments))
                .route("/admin/comments/:id", delete(admin_delete_comment)),
            AdminEntity::Registrations => router
                .route("/admin/registrations", get(admin_list_registrations))
                .route(
                    "/admin/registrations/:id/mark_attended",
                    post(admin_mark_attended),
                ),
        };
    }
    router.with_state(ctx)
}

#[utoipa::path(get, path = "/api/admin/users", tag = "Admin", params(SearchQuery), responses((status = 200, body = [UserResponse])))]
pub async fn admin_list_users(
    State(ctx): State<AppContext>,
    staff: StaffUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let repo = ctx.user_repo();
    let users = ListUsers {
        repo: repo.as_ref(),
    }
    .execute(&staff.identity(), q.search.as_deref())
    .await?;
    Ok(Json(users.into_iter().map(UserResponse::from_user).collect()))
}

#[utoipa::path(get, path = "/api/admin/events", tag = "Admin", params(AdminEventQuery), responses((status = 200, body = [EventResponse])))]
pub async fn admin_list_events(
    State(ctx): State<AppContext>,
    _staff: StaffUser,
    Query(q): Query<AdminEventQuery>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let filter = q.into_filter()?;
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
            .map(|dto| EventResponse::from_dto(&ctx.cfg, dto, filter.now))
            .collect(),
    ))
}

#[utoipa::path(post, path = "/api/admin/events/{id}/approve", tag = "Admin", params(("id" = Uuid, Path, description = "Event ID")), responses((status = 200, body = StatusResponse)))]
pub async fn admin_approve_event(
    State(ctx): State<AppContext>,
    staff: StaffUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusResponse>, AppError> {
    set_approval(&ctx, &staff, id, true).await?;
    Ok(StatusResponse::new("event approved"))
}

#[utoipa::path(post, path = "/api/admin/events/{id}/reject", tag = "Admin", params(("id" = Uuid, Path, description = "Event ID")), responses((status = 200, body = StatusResponse)))]
pub async fn admin_reject_event(
    State(ctx): State<AppContext>,
    staff: StaffUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusResponse>, AppError> {
    set_approval(&ctx, &staff, id, false).await?;
    Ok(StatusResponse::new("event rejected"))
}

async fn set_approval(
    ctx: &AppContext,
    staff: &StaffUser,
    id: Uuid,
    approved: bool,
) -> Result<(), AppError> {
    let events = ctx.event_repo();
    SetEventApproval {
        events: events.as_ref(),
    }
    .execute(&staff.identity(), id, approved)
    .await?;
    Ok(())
}

#[utoipa::path(get, path = "/api/admin/events/{id}/statistics", tag = "Admin", params(("id" = Uuid, Path, description = "Event ID")), responses((status = 200, body = EventStatisticsResponse)))]
pub async fn admin_event_statistics(
    State(ctx): State<AppContext>,
    staff: StaffUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventStatisticsResponse>, AppError> {
    let events = ctx.event_repo();
    let stats = EventStatistics {
        events: events.as_ref(),
    }
    .execute(&staff.identity(), id)
    .await?;
    Ok(Json(EventStatisticsResponse {
        total_registrations: stats.total_registrations,
        attended_registrations: stats.attended_registrations,
        attendance_rate: stats.attendance_rate,
        comments_count: stats.comments_count,
        images_count: stats.images_count,
    }))
}

#[utoipa::path(get, path = "/api/admin/comments", tag = "Admin", params(SearchQuery), responses((status = 200, body = [CommentResponse])))]
pub async fn admin_list_comments(
    State(ctx): State<AppContext>,
    _staff: StaffUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let comments = ctx.comment_repo();
    let list = ListComments {
        comments: comments.as_ref(),
    }
    .execute(&CommentFilter {
        search: q.search,
        ..CommentFilter::default()
    })
    .await?;
    Ok(Json(list.into_iter().map(CommentResponse::from).collect()))
}

#[utoipa::path(delete, path = "/api/admin/comments/{id}", tag = "Admin", params(("id" = Uuid, Path, description = "Comment ID")), responses((status = 204)))]
pub async fn admin_delete_comment(
    State(ctx): State<AppContext>,
    staff: StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let comments = ctx.comment_repo();
    DeleteComment {
        comments: comments.as_ref(),
    }
    .execute(&staff.identity(), id)
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/admin/registrations", tag = "Admin", params(RegistrationQuery), responses((status = 200, body = [RegistrationResponse])))]
pub async fn admin_list_registrations(
    State(ctx): State<AppContext>,
    staff: StaffUser,
    Query(q): Query<RegistrationQuery>,
) -> Result<Json<Vec<RegistrationResponse>>, AppError> {
    let registrations = ctx.registration_repo();
    let list = ListRegistrations {
        registrations: registrations.as_ref(),
    }
    .execute(&staff.identity(), q.into_filter())
    .await?;
    Ok(Json(
        list.into_iter().map(RegistrationResponse::from).collect(),
    ))
}

#[utoipa::path(post, path = "/api/admin/registrations/{id}/mark_attended", tag = "Admin", params(("id" = Uuid, Path, description = "Registration ID")), responses((status = 200, body = StatusResponse)))]
pub async fn admin_mark_attended(
    State(ctx): State<AppContext>,
    staff: StaffUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusResponse>, AppError> {
    let registrations = ctx.registration_repo();
    MarkAttended {
        registrations: registrations.as_ref(),
    }
    .execute(&staff.identity(), id)
    .await?;
    Ok(StatusResponse::new("marked as attended"))
}
