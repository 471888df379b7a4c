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
use crate::application::ports::registration_repository::RegistrationFilter;
use crate::application::use_cases::events::register_for_event::RegisterForEvent;
use crate::application::use_cases::registrations::delete_registration::DeleteRegistration;
use crate::application::use_cases::registrations::get_registration::GetRegistration;
use crate::application::use_cases::registrations::list_registrations::ListRegistrations;
use crate::application::use_cases::registrations::update_registration::{
    RegistrationChanges, UpdateRegistration,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::noticeboard::registration::EventRegistration;
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::extract::{ValidJson, double_option, parse_flag};

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub event: Uuid,
    pub user: Uuid,
    pub registration_date: DateTime<Utc>,
    pub attended: bool,
    pub notes: Option<String>,
}

impl From<EventRegistration> for RegistrationResponse {
    fn from(r: EventRegistration) -> Self {
        Self {
            id: r.id,
            event: r.event_id,
            user: r.user_id,
            registration_date: r.registration_date,
            attended: r.attended,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RegistrationQuery {
    pub event: Option<Uuid>,
    pub attended: Option<String>,
    pub search: Option<String>,
}

impl RegistrationQuery {
    pub(crate) fn into_filter(self) -> RegistrationFilter {
        RegistrationFilter {
            event_id: self.event,
            user_id: None,
            attended: parse_flag(self.attended.as_deref()),
            search: self.search,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRegistrationRequest {
    pub event: Uuid,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateRegistrationRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    /// Staff only.
    pub attended: Option<bool>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/registrations",
            get(list_registrations).post(create_registration),
        )
        .route(
            "/registrations/:id",
            get(get_registration)
                .patch(update_registration)
                .delete(delete_registration),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/registrations", tag = "Noticeboard", params(RegistrationQuery), responses((status = 200, body = [RegistrationResponse])))]
pub async fn list_registrations(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Query(q): Query<RegistrationQuery>,
) -> Result<Json<Vec<RegistrationResponse>>, AppError> {
    let registrations = ctx.registration_repo();
    let list = ListRegistrations {
        registrations: registrations.as_ref(),
    }
    .execute(&user.identity(), q.into_filter())
    .await?;
    Ok(Json(
        list.into_iter().map(RegistrationResponse::from).collect(),
    ))
}

#[utoipa::path(post, path = "/api/registrations", tag = "Noticeboard", request_body = CreateRegistrationRequest,
    responses((status = 201, body = RegistrationResponse), (status = 200, description = "Already registered", body = RegistrationResponse)))]
pub async fn create_registration(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    ValidJson(req): ValidJson<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError> {
    register(&ctx, &user, req.event, req.notes).await
}

/// Registers the caller; 201 for a new registration, 200 when one exists.
pub(crate) async fn register(
    ctx: &AppContext,
    user: &CurrentUser,
    event_id: Uuid,
    notes: Option<String>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError> {
    let events = ctx.event_repo();
    let registrations = ctx.registration_repo();
    let outcome = RegisterForEvent {
        events: events.as_ref(),
        registrations: registrations.as_ref(),
    }
    .execute(&user.identity(), event_id, notes)
    .await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.registration.into())))
}

#[utoipa::path(get, path = "/api/registrations/{id}", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Registration ID")), responses((status = 200, body = RegistrationResponse)))]
pub async fn get_registration(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let registrations = ctx.registration_repo();
    let registration = GetRegistration {
        registrations: registrations.as_ref(),
    }
    .execute(&user.identity(), id)
    .await?;
    Ok(Json(registration.into()))
}

#[utoipa::path(patch, path = "/api/registrations/{id}", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Registration ID")), request_body = UpdateRegistrationRequest, responses((status = 200, body = RegistrationResponse)))]
pub async fn update_registration(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidJson(req): ValidJson<UpdateRegistrationRequest>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let registrations = ctx.registration_repo();
    let registration = UpdateRegistration {
        registrations: registrations.as_ref(),
    }
    .execute(
        &user.identity(),
        id,
        RegistrationChanges {
            notes: req.notes,
            attended: req.attended,
        },
    )
    .await?;
    Ok(Json(registration.into()))
}

#[utoipa::path(delete, path = "/api/registrations/{id}", tag = "Noticeboard", params(("id" = Uuid, Path, description = "Registration ID")), responses((status = 204)))]
pub async fn delete_registration(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let registrations = ctx.registration_repo();
    DeleteRegistration {
        registrations: registrations.as_ref(),
    }
    .execute(&user.identity(), id)
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
