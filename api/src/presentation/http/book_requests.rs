use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::use_cases::book_requests::decide_request::{
    DecideBookRequest, RequestDecision,
};
use crate::application::use_cases::book_requests::delete_request::DeleteBookRequest;
use crate::application::use_cases::book_requests::get_request::GetBookRequest;
use crate::application::use_cases::book_requests::list_requests::ListBookRequests;
use crate::bootstrap::app_context::AppContext;
use crate::domain::bookbank::request::{BookRequest, BookRequestDetail, RequestStatus};
use crate::presentation::http::auth::CurrentUser;

#[derive(Debug, Serialize, ToSchema)]
pub struct BookRequestResponse {
    pub id: Uuid,
    pub book: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,
    pub requested_by: Uuid,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub status_display: &'static str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookRequestResponse {
    pub fn from_request(r: BookRequest) -> Self {
        Self {
            id: r.id,
            book: r.book_id,
            book_title: None,
            requested_by: r.requested_by,
            message: r.message,
            status_display: r.status.label(),
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }

    pub fn from_detail(d: BookRequestDetail) -> Self {
        Self {
            book_title: Some(d.book_title),
            ..Self::from_request(d.request)
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/book-requests", get(list_book_requests))
        .route(
            "/book-requests/:id",
            get(get_book_request).delete(delete_book_request),
        )
        .route("/book-requests/:id/approve", post(approve_book_request))
        .route("/book-requests/:id/reject", post(reject_book_request))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/book-requests", tag = "Book requests", responses((status = 200, body = [BookRequestResponse])))]
pub async fn list_book_requests(
    State(ctx): State<AppContext>,
    user: CurrentUser,
) -> Result<Json<Vec<BookRequestResponse>>, AppError> {
    let requests = ctx.book_request_repo();
    let list = ListBookRequests {
        requests: requests.as_ref(),
    }
    .execute(&user.identity())
    .await?;
    Ok(Json(
        list.into_iter()
            .map(BookRequestResponse::from_detail)
            .collect(),
    ))
}

#[utoipa::path(get, path = "/api/book-requests/{id}", tag = "Book requests", params(("id" = Uuid, Path, description = "Request ID")), responses((status = 200, body = BookRequestResponse)))]
pub async fn get_book_request(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookRequestResponse>, AppError> {
    let requests = ctx.book_request_repo();
    let detail = GetBookRequest {
        requests: requests.as_ref(),
    }
    .execute(&user.identity(), id)
    .await?;
    Ok(Json(BookRequestResponse::from_detail(detail)))
}

#[utoipa::path(delete, path = "/api/book-requests/{id}", tag = "Book requests", params(("id" = Uuid, Path, description = "Request ID")), responses((status = 204)))]
pub async fn delete_book_request(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let requests = ctx.book_request_repo();
    DeleteBookRequest {
        requests: requests.as_ref(),
    }
    .execute(&user.identity(), id)
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/book-requests/{id}/approve", tag = "Book requests", params(("id" = Uuid, Path, description = "Request ID")), responses((status = 200, body = BookRequestResponse)))]
pub async fn approve_book_request(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookRequestResponse>, AppError> {
    decide(&ctx, &user, id, RequestDecision::Accept).await
}

#[utoipa::path(post, path = "/api/book-requests/{id}/reject", tag = "Book requests", params(("id" = Uuid, Path, description = "Request ID")), responses((status = 200, body = BookRequestResponse)))]
pub async fn reject_book_request(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookRequestResponse>, AppError> {
    decide(&ctx, &user, id, RequestDecision::Reject).await
}

async fn decide(
    ctx: &AppContext,
    user: &CurrentUser,
    id: Uuid,
    decision: RequestDecision,
) -> Result<Json<BookRequestResponse>, AppError> {
    let requests = ctx.book_request_repo();
    let request = DecideBookRequest {
        requests: requests.as_ref(),
    }
    .execute(&user.identity(), id, decision)
    .await?;
    Ok(Json(BookRequestResponse::from_request(request)))
}
