use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::use_cases::accounts::get_user::GetUser;
use crate::application::use_cases::accounts::remove_user::RemoveUser;
use crate::application::use_cases::auth::update_profile::UpdateAccount;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::{AccountPatch, CurrentUser, UserResponse};
use crate::presentation::http::extract::ValidJson;

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/users/{id}", tag = "Accounts", params(("id" = Uuid, Path, description = "User ID")), responses((status = 200, body = UserResponse)))]
pub async fn get_user(
    State(ctx): State<AppContext>,
    _caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let repo = ctx.user_repo();
    let account = GetUser {
        repo: repo.as_ref(),
    }
    .execute(id)
    .await?;
    Ok(Json(UserResponse::from_account(&ctx.cfg, account)))
}

/// Self-or-staff edit. Only staff may flip `is_active` / `is_staff`.
#[utoipa::path(patch, path = "/api/users/{id}", tag = "Accounts", params(("id" = Uuid, Path, description = "User ID")), request_body = AccountPatch, responses((status = 200, body = UserResponse)))]
pub async fn update_user(
    State(ctx): State<AppContext>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    ValidJson(patch): ValidJson<AccountPatch>,
) -> Result<Json<UserResponse>, AppError> {
    let repo = ctx.user_repo();
    let target = GetUser {
        repo: repo.as_ref(),
    }
    .execute(id)
    .await?;
    let account = UpdateAccount {
        repo: repo.as_ref(),
    }
    .execute(&caller.identity(), &target.user, patch.into())
    .await?;
    Ok(Json(UserResponse::from_account(&ctx.cfg, account)))
}

#[utoipa::path(delete, path = "/api/users/{id}", tag = "Accounts", params(("id" = Uuid, Path, description = "User ID")), responses((status = 204)))]
pub async fn delete_user(
    State(ctx): State<AppContext>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let users = ctx.user_repo();
    let images = ctx.image_repo();
    let items = ctx.lost_found_repo();
    let storage = ctx.storage_port();
    RemoveUser {
        user_repo: users.as_ref(),
        images: images.as_ref(),
        items: items.as_ref(),
        storage: storage.as_ref(),
    }
    .execute(&caller.identity(), id)
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
