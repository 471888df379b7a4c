use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::application::error::AppError;
use crate::application::ports::comment_repository::CommentFilter;
use crate::application::use_cases::comments::create_comment::CreateComment;
use crate::application::use_cases::comments::delete_comment::DeleteComment;
use crate::application::use_cases::comments::get_comment::GetComment;
use crate::application::use_cases::comments::list_comments::ListComments;
use crate::application::use_cases::comments::update_comment::UpdateComment;
use crate::bootstrap::app_context::AppContext;
use crate::domain::noticeboard::comment::EventComment;
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::extract::ValidJson;

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: Uuid,
    pub event: Uuid,
    pub user: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventComment> for CommentResponse {
    fn from(c: EventComment) -> Self {
        Self {
            id: c.id,
            event: c.event_id,
            user: c.user_id,
            content: c.content,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CommentQuery {
    /// Only comments on this event.
    pub event: Option<Uuid>,
    pub user: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    pub event: Uuid,
    pub content: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommentContent {
    pub content: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/comments", get(list_comments).post(create_comment))
        .route(
            "/comments/:id",
            get(get_comment).patch(update_comment).delete(delete_comment),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/comments", tag = "Noticeboard", params(CommentQuery), security(()), responses((status = 200, body = [CommentResponse])))]
pub async fn list_comments(
    State(ctx): State<AppContext>,
    Query(q): Query<CommentQuery>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let filter = CommentFilter {
        event_id: q.event,
        user_id: q.user,
        search: q.search,
    };
    let comments = ctx.comment_repo();
    let list = ListComments {
        comments: comments.as_ref(),
    }
    .execute(&filter)
    .await?;
    Ok(Json(list.into_iter().map(CommentResponse::from).collect()))
}

#[utoipa::path(post, path = "/api/comments", tag = "Noticeboard", request_body = CreateCommentRequest, responses((status = 201, body = CommentResponse)))]
pub async fn create_comment(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    ValidJson(req): ValidJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    post_comment(&ctx, &user, req.event, &req.content).await
}

pub(crate) async fn post_comment(
    ctx: &AppContext,
    user: &CurrentUser,
    event_id: Uuid,
    content: &str,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let events = ctx.event_repo();
    let comments = ctx.comment_repo();
    let comment = CreateComment {
        events: events.as_ref(),
        comments: comments.as_ref(),
    }
    .execute(&user.identity(), event_id, content)
    .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

#[utoipa::path(get, path = "/api/comments/{id}", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Comment ID")), security(()), responses((status = 200, body = CommentResponse)))]
pub async fn get_comment(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<CommentResponse>, AppError> {
    let comments = ctx.comment_repo();
    let comment = GetComment {
        comments: comments.as_ref(),
    }
    .execute(id)
    .await?;
    Ok(Json(comment.into()))
}

#[utoipa::path(patch, path = "/api/comments/{id}", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Comment ID")), request_body = CommentContent, responses((status = 200, body = CommentResponse)))]
pub async fn update_comment(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidJson(req): ValidJson<CommentContent>,
) -> Result<Json<CommentResponse>, AppError> {
    let comments = ctx.comment_repo();
    let comment = UpdateComment {
        comments: comments.as_ref(),
    }
    .execute(&user.identity(), id, &req.content)
    .await?;
    Ok(Json(comment.into()))
}

#[utoipa::path(delete, path = "/api/comments/{id}", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Comment ID")), responses((status = 204)))]
pub async fn delete_comment(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let comments = ctx.comment_repo();
    DeleteComment {
        comments: comments.as_ref(),
    }
    .execute(&user.identity(), id)
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
