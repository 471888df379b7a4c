use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::{StatusCode, request::Parts},
    routing::{delete, get, patch, post},
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application::access::Identity;
use crate::application::dto::accounts::{AccountChanges, AccountDto, RegisterInput};
use crate::application::error::AppError;
use crate::application::use_cases::auth::change_password::{
    ChangePassword, ChangePasswordRequest as ChangePasswordDto,
};
use crate::application::use_cases::auth::delete_account::DeleteAccount;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register::Register as RegisterUc;
use crate::application::use_cases::auth::resolve_identity::ResolveIdentity;
use crate::application::use_cases::auth::update_profile::UpdateAccount;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::accounts::user::User;
use crate::presentation::http::extract::{ValidJson, double_option};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "This field may not be blank."))]
    pub name: String,
    #[validate(length(min = 1, max = 15, message = "Enter a valid mobile number."))]
    pub mobile: String,
    pub address: Option<String>,
    pub password: String,
    pub password2: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub bio: Option<String>,
    pub department: Option<String>,
    pub student_id: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub mobile: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileResponse>,
}

impl UserResponse {
    pub fn from_user(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            mobile: user.mobile,
            address: user.address,
            is_active: user.is_active,
            is_staff: user.is_staff,
            date_joined: user.date_joined,
            last_login: user.last_login,
            profile: None,
        }
    }

    pub fn from_account(cfg: &Config, account: AccountDto) -> Self {
        let profile = ProfileResponse {
            bio: account.profile.bio,
            department: account.profile.department,
            student_id: account.profile.student_id,
            profile_picture: account
                .profile
                .profile_picture
                .map(|key| cfg.upload_url(&key)),
        };
        let mut out = Self::from_user(account.user);
        out.profile = Some(profile);
        out
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub email: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access: String,
}

/// Partial account update; `null` clears optional fields.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct AccountPatch {
    #[validate(length(min = 1, max = 100, message = "This field may not be blank."))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 15, message = "Enter a valid mobile number."))]
    pub mobile: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub department: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub student_id: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
}

impl From<AccountPatch> for AccountChanges {
    fn from(p: AccountPatch) -> Self {
        AccountChanges {
            name: p.name,
            mobile: p.mobile,
            address: p.address,
            bio: p.bio,
            department: p.department,
            student_id: p.student_id,
            is_active: p.is_active,
            is_staff: p.is_staff,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub password: String,
    pub password2: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteAccountRequest {
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckAuthResponse {
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    pub token_type: TokenKind,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/token/refresh", post(refresh))
        .route("/profile", get(profile).patch(update_profile))
        .route("/profile/update", patch(update_profile_message))
        .route(
            "/change-password",
            patch(change_password).put(change_password),
        )
        .route("/delete-account", delete(delete_account))
        .route("/check-auth", get(check_auth))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/auth/register", tag = "Auth", request_body = RegisterRequest, security(()), responses(
    (status = 201, body = UserResponse),
    (status = 400, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn register(
    State(ctx): State<AppContext>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let dto = RegisterInput {
        email: req.email,
        name: req.name,
        mobile: req.mobile,
        address: req.address,
        password: req.password,
        password2: req.password2,
    };
    let user = uc.execute(&dto).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from_user(user))))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = LoginResponse),
    (status = 401, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        email: req.email,
        password: req.password,
    };
    let user = uc.execute(&dto).await?;
    let access = issue_token(&ctx.cfg, user.id, TokenKind::Access)?;
    let refresh = issue_token(&ctx.cfg, user.id, TokenKind::Refresh)?;
    Ok(Json(LoginResponse {
        access,
        refresh,
        user: UserResponse::from_user(user),
    }))
}

#[utoipa::path(post, path = "/api/auth/token/refresh", tag = "Auth", request_body = RefreshRequest, security(()), responses(
    (status = 200, body = RefreshResponse),
    (status = 401, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn refresh(
    State(ctx): State<AppContext>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let user_id = decode_token(&ctx.cfg, &req.refresh, TokenKind::Refresh)?;
    let repo = ctx.user_repo();
    let user = ResolveIdentity {
        repo: repo.as_ref(),
    }
    .execute(user_id)
    .await?;
    Ok(Json(RefreshResponse {
        access: issue_token(&ctx.cfg, user.id, TokenKind::Access)?,
    }))
}

#[utoipa::path(get, path = "/api/auth/profile", tag = "Auth", responses((status = 200, body = UserResponse)))]
pub async fn profile(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let repo = ctx.user_repo();
    let account = GetMe {
        repo: repo.as_ref(),
    }
    .execute(user.id)
    .await?;
    Ok(Json(UserResponse::from_account(&ctx.cfg, account)))
}

async fn apply_own_changes(
    ctx: &AppContext,
    user: &User,
    patch: AccountPatch,
) -> Result<AccountDto, AppError> {
    let repo = ctx.user_repo();
    UpdateAccount {
        repo: repo.as_ref(),
    }
    .execute(&Identity::from_user(user), user, patch.into())
    .await
}

#[utoipa::path(patch, path = "/api/auth/profile", tag = "Auth", request_body = AccountPatch, responses((status = 200, body = UserResponse)))]
pub async fn update_profile(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    ValidJson(patch): ValidJson<AccountPatch>,
) -> Result<Json<UserResponse>, AppError> {
    let account = apply_own_changes(&ctx, &user, patch).await?;
    Ok(Json(UserResponse::from_account(&ctx.cfg, account)))
}

#[utoipa::path(patch, path = "/api/auth/profile/update", tag = "Auth", request_body = AccountPatch, responses((status = 200, body = MessageResponse)))]
pub async fn update_profile_message(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    ValidJson(patch): ValidJson<AccountPatch>,
) -> Result<Json<MessageResponse>, AppError> {
    apply_own_changes(&ctx, &user, patch).await?;
    Ok(MessageResponse::new("Profile updated successfully"))
}

#[utoipa::path(patch, path = "/api/auth/change-password", tag = "Auth", request_body = ChangePasswordRequest, responses((status = 200, body = MessageResponse)))]
pub async fn change_password(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let repo = ctx.user_repo();
    ChangePassword {
        repo: repo.as_ref(),
    }
    .execute(
        user.id,
        &ChangePasswordDto {
            old_password: req.old_password,
            password: req.password,
            password2: req.password2,
        },
    )
    .await?;
    Ok(MessageResponse::new("Password updated successfully"))
}

#[utoipa::path(delete, path = "/api/auth/delete-account", tag = "Auth", request_body = DeleteAccountRequest, responses((status = 200, body = MessageResponse)))]
pub async fn delete_account(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<DeleteAccountRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let users = ctx.user_repo();
    let images = ctx.image_repo();
    let items = ctx.lost_found_repo();
    let storage = ctx.storage_port();
    DeleteAccount {
        user_repo: users.as_ref(),
        images: images.as_ref(),
        items: items.as_ref(),
        storage: storage.as_ref(),
    }
    .execute(user.id, &req.password)
    .await?;
    Ok(MessageResponse::new("Account deleted successfully"))
}

#[utoipa::path(get, path = "/api/auth/check-auth", tag = "Auth", responses((status = 200, body = CheckAuthResponse)))]
pub async fn check_auth(CurrentUser(user): CurrentUser) -> Json<CheckAuthResponse> {
    Json(CheckAuthResponse {
        is_authenticated: true,
        user: UserResponse::from_user(user),
    })
}

// --- Bearer extractor & JWT utils ---

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|auth| auth.strip_prefix("Bearer "))
            .map(|t| Bearer(t.trim().to_string()))
            .ok_or(AppError::Unauthenticated)
    }
}

pub fn issue_token(cfg: &Config, user_id: Uuid, kind: TokenKind) -> Result<String, AppError> {
    let now = Utc::now().timestamp().max(0) as usize;
    let ttl = match kind {
        TokenKind::Access => cfg.jwt_access_ttl_secs,
        TokenKind::Refresh => cfg.jwt_refresh_ttl_secs,
    };
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + ttl.max(0) as usize,
        iat: now,
        token_type: kind,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.into()))
}

/// Verifies signature, expiry and token type, returning the subject.
pub fn decode_token(cfg: &Config, token: &str, expected: TokenKind) -> Result<Uuid, AppError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthenticated)?;
    if data.claims.token_type != expected {
        return Err(AppError::Unauthenticated);
    }
    Uuid::parse_str(&data.claims.sub).map_err(|_| AppError::Unauthenticated)
}

async fn resolve_bearer(ctx: &AppContext, bearer: Bearer) -> Result<User, AppError> {
    let user_id = decode_token(&ctx.cfg, &bearer.0, TokenKind::Access)?;
    let repo = ctx.user_repo();
    ResolveIdentity {
        repo: repo.as_ref(),
    }
    .execute(user_id)
    .await
}

/// The authenticated, active account behind the request's access token.
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn identity(&self) -> Identity {
        Identity::from_user(&self.0)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppContext> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let bearer = Bearer::from_request_parts(parts, ctx).await?;
        Ok(CurrentUser(resolve_bearer(ctx, bearer).await?))
    }
}

/// Like [`CurrentUser`] for endpoints that also serve anonymous callers.
/// A token that is present but invalid is still rejected.
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn identity(&self) -> Option<Identity> {
        self.0.as_ref().map(Identity::from_user)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppContext> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        if !parts
            .headers
            .contains_key(axum::http::header::AUTHORIZATION)
        {
            return Ok(MaybeUser(None));
        }
        let bearer = Bearer::from_request_parts(parts, ctx).await?;
        Ok(MaybeUser(Some(resolve_bearer(ctx, bearer).await?)))
    }
}
