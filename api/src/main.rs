use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use campus_api::application::ports::storage_port::StoragePort;
use campus_api::application::use_cases::accounts::ensure_admin::{AdminSeed, EnsureAdmin};
use campus_api::bootstrap::app_context::{AppContext, AppServices};
use campus_api::bootstrap::config::{Config, StorageBackend};
use campus_api::infrastructure::storage::{FsStoragePort, S3StoragePort};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            campus_api::presentation::http::auth::register,
            campus_api::presentation::http::auth::login,
            campus_api::presentation::http::auth::refresh,
            campus_api::presentation::http::auth::profile,
            campus_api::presentation::http::auth::update_profile,
            campus_api::presentation::http::auth::update_profile_message,
            campus_api::presentation::http::auth::change_password,
            campus_api::presentation::http::auth::delete_account,
            campus_api::presentation::http::auth::check_auth,
            campus_api::presentation::http::accounts::get_user,
            campus_api::presentation::http::accounts::update_user,
            campus_api::presentation::http::accounts::delete_user,
            campus_api::presentation::http::books::list_books,
            campus_api::presentation::http::books::create_book,
            campus_api::presentation::http::books::get_book,
            campus_api::presentation::http::books::update_book,
            campus_api::presentation::http::books::delete_book,
            campus_api::presentation::http::books::request_book,
            campus_api::presentation::http::books::list_book_images,
            campus_api::presentation::http::books::upload_book_image,
            campus_api::presentation::http::books::delete_book_image,
            campus_api::presentation::http::books::set_primary_book_image,
            campus_api::presentation::http::book_requests::list_book_requests,
            campus_api::presentation::http::book_requests::get_book_request,
            campus_api::presentation::http::book_requests::delete_book_request,
            campus_api::presentation::http::book_requests::approve_book_request,
            campus_api::presentation::http::book_requests::reject_book_request,
            campus_api::presentation::http::lost_found::list_items,
            campus_api::presentation::http::lost_found::create_item,
            campus_api::presentation::http::lost_found::get_item,
            campus_api::presentation::http::lost_found::update_item,
            campus_api::presentation::http::lost_found::delete_item,
            campus_api::presentation::http::lost_found::mark_found,
            campus_api::presentation::http::lost_found::claim_item,
            campus_api::presentation::http::lost_found::unclaim_item,
            campus_api::presentation::http::lost_found::upload_item_image,
            campus_api::presentation::http::lost_found::clear_item_image,
            campus_api::presentation::http::events::list_events,
            campus_api::presentation::http::events::create_event,
            campus_api::presentation::http::events::get_event,
            campus_api::presentation::http::events::update_event,
            campus_api::presentation::http::events::delete_event,
            campus_api::presentation::http::events::register_for_event,
            campus_api::presentation::http::events::list_event_comments,
            campus_api::presentation::http::events::create_event_comment,
            campus_api::presentation::http::events::list_event_images,
            campus_api::presentation::http::events::upload_event_image,
            campus_api::presentation::http::events::delete_event_image,
            campus_api::presentation::http::events::set_primary_event_image,
            campus_api::presentation::http::registrations::list_registrations,
            campus_api::presentation::http::registrations::create_registration,
            campus_api::presentation::http::registrations::get_registration,
            campus_api::presentation::http::registrations::update_registration,
            campus_api::presentation::http::registrations::delete_registration,
            campus_api::presentation::http::comments::list_comments,
            campus_api::presentation::http::comments::create_comment,
            campus_api::presentation::http::comments::get_comment,
            campus_api::presentation::http::comments::update_comment,
            campus_api::presentation::http::comments::delete_comment,
            campus_api::presentation::http::roommates::list_roommates,
            campus_api::presentation::http::roommates::create_roommate,
            campus_api::presentation::http::roommates::get_roommate,
            campus_api::presentation::http::roommates::update_roommate,
            campus_api::presentation::http::roommates::delete_roommate,
            campus_api::presentation::http::roommates::list_roommate_images,
            campus_api::presentation::http::roommates::upload_roommate_image,
            campus_api::presentation::http::roommates::delete_roommate_image,
            campus_api::presentation::http::roommates::set_primary_roommate_image,
            campus_api::presentation::http::admin::admin_list_users,
            campus_api::presentation::http::admin::admin_list_events,
            campus_api::presentation::http::admin::admin_approve_event,
            campus_api::presentation::http::admin::admin_reject_event,
            campus_api::presentation::http::admin::admin_event_statistics,
            campus_api::presentation::http::admin::admin_list_comments,
            campus_api::presentation::http::admin::admin_delete_comment,
            campus_api::presentation::http::admin::admin_list_registrations,
            campus_api::presentation::http::admin::admin_mark_attended,
            campus_api::presentation::http::uploads::serve_upload,
            campus_api::presentation::http::health::health,
        ),
        components(schemas(
            campus_api::presentation::http::error::ErrorBody,
            campus_api::presentation::http::auth::RegisterRequest,
            campus_api::presentation::http::auth::LoginRequest,
            campus_api::presentation::http::auth::LoginResponse,
            campus_api::presentation::http::auth::RefreshRequest,
            campus_api::presentation::http::auth::RefreshResponse,
            campus_api::presentation::http::auth::ProfileResponse,
            campus_api::presentation::http::auth::UserResponse,
            campus_api::presentation::http::auth::AccountPatch,
            campus_api::presentation::http::auth::ChangePasswordRequest,
            campus_api::presentation::http::auth::DeleteAccountRequest,
            campus_api::presentation::http::auth::MessageResponse,
            campus_api::presentation::http::auth::CheckAuthResponse,
            campus_api::presentation::http::images::ImageResponse,
            campus_api::presentation::http::images::ImageUploadForm,
            campus_api::presentation::http::books::BookResponse,
            campus_api::presentation::http::books::CreateBookRequest,
            campus_api::presentation::http::books::UpdateBookRequest,
            campus_api::presentation::http::books::RequestBookBody,
            campus_api::presentation::http::book_requests::BookRequestResponse,
            campus_api::presentation::http::lost_found::ItemResponse,
            campus_api::presentation::http::lost_found::CreateItemRequest,
            campus_api::presentation::http::lost_found::UpdateItemRequest,
            campus_api::presentation::http::events::EventResponse,
            campus_api::presentation::http::events::EventDetailResponse,
            campus_api::presentation::http::events::CreateEventRequest,
            campus_api::presentation::http::events::UpdateEventRequest,
            campus_api::presentation::http::events::EventRegisterRequest,
            campus_api::presentation::http::registrations::RegistrationResponse,
            campus_api::presentation::http::registrations::CreateRegistrationRequest,
            campus_api::presentation::http::registrations::UpdateRegistrationRequest,
            campus_api::presentation::http::comments::CommentResponse,
            campus_api::presentation::http::comments::CreateCommentRequest,
            campus_api::presentation::http::comments::CommentContent,
            campus_api::presentation::http::roommates::RoommateResponse,
            campus_api::presentation::http::roommates::CreateRoommateRequest,
            campus_api::presentation::http::roommates::UpdateRoommateRequest,
            campus_api::presentation::http::admin::StatusResponse,
            campus_api::presentation::http::admin::EventStatisticsResponse,
            campus_api::presentation::http::health::HealthResp,
            campus_api::domain::bookbank::book::Condition,
            campus_api::domain::bookbank::book::TransactionType,
            campus_api::domain::bookbank::request::RequestStatus,
            campus_api::domain::lostfound::item::ItemStatus,
            campus_api::domain::noticeboard::event::EventType,
            campus_api::domain::roommate::post::RoomType,
            campus_api::domain::roommate::post::GenderPreference,
            campus_api::domain::roommate::post::Occupation,
        )),
        tags(
            (name = "Auth", description = "Registration, login and the caller's own account"),
            (name = "Accounts", description = "User accounts"),
            (name = "Books", description = "Book bank listings"),
            (name = "Book requests", description = "Requests for listed books"),
            (name = "Lost & found", description = "Lost and found items"),
            (name = "Noticeboard", description = "Events, registrations and comments"),
            (name = "Roommates", description = "Roommate listings"),
            (name = "Admin", description = "Staff-only moderation"),
            (name = "Uploads", description = "Stored images"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn cors_layer(cfg: &Config) -> CorsLayer {
    let methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::PUT,
        http::Method::DELETE,
        http::Method::PATCH,
        http::Method::OPTIONS,
    ];
    let headers = [http::header::CONTENT_TYPE, http::header::AUTHORIZATION];
    let base = CorsLayer::new().allow_methods(methods).allow_headers(headers);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        _ if cfg.is_production => {
            // FRONTEND_URL is required in production; deny all if it is unusable
            base.allow_origin(AllowOrigin::exact(HeaderValue::from_static(
                "http://invalid",
            )))
        }
        _ => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "campus_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        port = cfg.api_port,
        storage = ?cfg.storage_backend,
        admin_entities = ?cfg.admin_entities,
        "Starting campus backend"
    );

    // Database
    let pool = campus_api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    campus_api::infrastructure::db::migrate(&pool).await?;

    let storage_port: Arc<dyn StoragePort> = match cfg.storage_backend {
        StorageBackend::Filesystem => {
            if let Err(e) = tokio::fs::create_dir_all(&cfg.storage_root).await {
                tracing::warn!(error=?e, dir=%cfg.storage_root, "Failed to create uploads dir");
            }
            Arc::new(FsStoragePort::new(&cfg.storage_root))
        }
        StorageBackend::S3 => Arc::new(S3StoragePort::new(&cfg).await?),
    };

    let ctx = AppContext::new(cfg.clone(), AppServices::postgres(pool, storage_port));

    if let Some(admin) = &cfg.bootstrap_admin {
        let repo = ctx.user_repo();
        let seed = AdminSeed {
            email: admin.email.clone(),
            password: admin.password.clone(),
            name: admin.name.clone(),
            mobile: admin.mobile.clone(),
        };
        if let Err(e) = (EnsureAdmin {
            repo: repo.as_ref(),
        })
        .execute(&seed)
        .await
        {
            error!(error = ?e, email = %seed.email, "admin_bootstrap_failed");
        }
    }

    let app = campus_api::presentation::http::api_router(ctx)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(&cfg))
        // Global body size limit for uploads (configurable)
        .layer(DefaultBodyLimit::max(cfg.upload_max_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(?e, "shutdown_signal_failed");
            }
        })
        .await?;
    Ok(())
}
