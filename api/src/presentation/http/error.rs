use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::error::AppError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

/// Postgres unique_violation surfaced through an `anyhow` chain.
fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| match e {
                sqlx::Error::Database(db) => db.code(),
                _ => None,
            })
            .map(|code| code == "23505")
            .unwrap_or(false)
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    detail: "Invalid input.".into(),
                    code: "validation_error",
                    fields: Some(fields.into_map()),
                },
            ),
            AppError::Invalid(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    detail,
                    code: "invalid",
                    fields: None,
                },
            ),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    detail: AppError::Unauthenticated.to_string(),
                    code: "not_authenticated",
                    fields: None,
                },
            ),
            AppError::Forbidden(detail) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    detail,
                    code: "permission_denied",
                    fields: None,
                },
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    detail: format!("No {what} matches the given query."),
                    code: "not_found",
                    fields: None,
                },
            ),
            AppError::Conflict(detail) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    detail,
                    code: "conflict",
                    fields: None,
                },
            ),
            AppError::Internal(err) if is_unique_violation(&err) => {
                tracing::info!(error = ?err, "unique_violation");
                (
                    StatusCode::CONFLICT,
                    ErrorBody {
                        detail: "A record with these values already exists.".into(),
                        code: "conflict",
                        fields: None,
                    },
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "request_failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        detail: "A server error occurred.".into(),
                        code: "internal_error",
                        fields: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
