pub mod accounts;
pub mod admin;
pub mod auth;
pub mod book_requests;
pub mod books;
pub mod comments;
pub mod error;
pub mod events;
pub mod extract;
pub mod health;
pub mod images;
pub mod lost_found;
pub mod registrations;
pub mod roommates;
pub mod uploads;

use axum::Router;

use crate::bootstrap::app_context::AppContext;

/// Every HTTP route, mounted under `/api`.
pub fn api_router(ctx: AppContext) -> Router {
    Router::new()
        .nest("/api", health::routes(ctx.clone()))
        .nest("/api/auth", auth::routes(ctx.clone()))
        .nest("/api", accounts::routes(ctx.clone()))
        .nest("/api", books::routes(ctx.clone()))
        .nest("/api", book_requests::routes(ctx.clone()))
        .nest("/api", lost_found::routes(ctx.clone()))
        .nest("/api", events::routes(ctx.clone()))
        .nest("/api", registrations::routes(ctx.clone()))
        .nest("/api", comments::routes(ctx.clone()))
        .nest("/api", roommates::routes(ctx.clone()))
        .nest("/api", admin::routes(ctx.clone()))
        .nest("/api", uploads::routes(ctx))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::application::ports::storage_port::StoragePort;
    use crate::application::test_support::InMemoryStore;
    use crate::bootstrap::app_context::AppServices;
    use crate::bootstrap::config::{AdminEntity, Config};
    use crate::domain::accounts::user::User;
    use crate::presentation::http::auth::{TokenKind, issue_token};

    fn app_with(cfg: Config) -> (Router, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::default());
        let services = AppServices::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        );
        (api_router(AppContext::new(cfg, services)), store)
    }

    fn app() -> (Router, Arc<InMemoryStore>) {
        app_with(Config::for_tests())
    }

    fn bearer(user: &User) -> String {
        let token = issue_token(&Config::for_tests(), user.id, TokenKind::Access).unwrap();
        format!("Bearer {token}")
    }

    fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_no_database_without_a_pool() {
        let (app, _) = app();
        let res = app.oneshot(get("/api/health", None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "none");
    }

    #[tokio::test]
    async fn register_then_login_issues_tokens_that_authenticate() {
        let (app, _) = app();
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                None,
                json!({
                    "email": "ada@campus.test",
                    "name": "Ada",
                    "mobile": "+15550001",
                    "password": "s3cret-pass",
                    "password2": "s3cret-pass"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                json!({"email": "ada@campus.test", "password": "s3cret-pass"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        let access = body["access"].as_str().unwrap().to_string();
        assert!(body["refresh"].is_string());

        let auth = format!("Bearer {access}");
        let res = app
            .oneshot(get("/api/auth/check-auth", Some(&auth)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["isAuthenticated"], true);
        assert_eq!(body["user"]["email"], "ada@campus.test");
    }

    #[tokio::test]
    async fn posting_a_book_requires_a_token() {
        let (app, store) = app();
        let payload = json!({"title": "Calculus", "author": "Spivak", "department": "Math"});
        let res = app
            .clone()
            .oneshot(json_request("POST", "/api/books", None, payload.clone()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let user = store.seed_user("poster@campus.test", false);
        let res = app
            .clone()
            .oneshot(json_request("POST", "/api/books", Some(&bearer(&user)), payload))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = body_json(res).await;
        assert_eq!(body["posted_by"], user.id.to_string());
        assert_eq!(body["contact_email"], "poster@campus.test");

        let res = app.oneshot(get("/api/books", None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let (app, store) = app();
        let user = store.seed_user("poster@campus.test", false);
        let req = Request::builder()
            .method("POST")
            .uri("/api/books")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, bearer(&user))
            .body(Body::from("{not json"))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn item_patch_ignores_lifecycle_flags() {
        let (app, store) = app();
        let reporter = store.seed_user("reporter@campus.test", false);
        let finder = store.seed_user("finder@campus.test", false);
        let item = store.seed_item(reporter.id);

        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/items/{}/claim", item.id),
                Some(&bearer(&finder)),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .oneshot(json_request(
                "PATCH",
                &format!("/api/items/{}", item.id),
                Some(&bearer(&reporter)),
                json!({"status": "found", "is_resolved": false, "color": "red"}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["color"], "red");
        assert_eq!(body["status"], "lost");
        assert_eq!(body["is_resolved"], true);
        assert_eq!(body["claimed_by"], finder.id.to_string());
    }

    #[tokio::test]
    async fn admin_routes_need_staff_and_can_be_disabled() {
        let (app, store) = app();
        let student = store.seed_user("student@campus.test", false);
        let staff = store.seed_user("staff@campus.test", true);

        let res = app
            .clone()
            .oneshot(get("/api/admin/users", Some(&bearer(&student))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = app
            .oneshot(get("/api/admin/users", Some(&bearer(&staff))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await.as_array().unwrap().len(), 2);

        let mut cfg = Config::for_tests();
        cfg.admin_entities = vec![AdminEntity::Events];
        let (app, store) = app_with(cfg);
        let staff = store.seed_user("staff@campus.test", true);
        let res = app
            .oneshot(get("/api/admin/users", Some(&bearer(&staff))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn uploads_are_served_with_a_guessed_content_type() {
        let (app, store) = app();
        let blob = store
            .store_image("books", uuid::Uuid::new_v4(), Some("cover.png"), b"png-bytes")
            .await
            .unwrap();

        let res = app
            .clone()
            .oneshot(get(&format!("/api/uploads/{}", blob.key), None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(res.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

        let res = app
            .oneshot(get("/api/uploads/books/../secret.png", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
