use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::bootstrap::app_context::AppContext;

/// Serves stored image bytes. Keys are public; listings link to them.
#[utoipa::path(get, path = "/api/uploads/{key}", tag = "Uploads", params(("key" = String, Path, description = "Storage key")), security(()),
    responses((status = 200, description = "Image bytes"), (status = 404, description = "Unknown key")))]
pub async fn serve_upload(
    State(ctx): State<AppContext>,
    Path(key): Path<String>,
) -> Result<Response, StatusCode> {
    if key
        .split('/')
        .any(|seg| seg.is_empty() || seg == "." || seg == "..")
    {
        return Err(StatusCode::NOT_FOUND);
    }
    let storage = ctx.storage_port();
    let data = storage.read_bytes(&key).await.map_err(|err| {
        tracing::debug!(%key, error = ?err, "upload_not_served");
        StatusCode::NOT_FOUND
    })?;

    let content_type = mime_guess::from_path(&key).first_or_octet_stream();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type.essence_str())
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    Ok((headers, data).into_response())
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/uploads/*key", get(serve_upload))
        .with_state(ctx)
}
