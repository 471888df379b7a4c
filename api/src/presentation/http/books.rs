use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::books::{BookChanges, BookDto, BookInput};
use crate::application::error::AppError;
use crate::application::ports::book_repository::BookFilter;
use crate::application::use_cases::books::create_book::CreateBook;
use crate::application::use_cases::books::delete_book::DeleteBook;
use crate::application::use_cases::books::get_book::GetBook;
use crate::application::use_cases::books::list_books::ListBooks;
use crate::application::use_cases::books::request_book::RequestBook;
use crate::application::use_cases::books::update_book::UpdateBook;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::attachments::image::ImageParent;
use crate::domain::bookbank::book::{Condition, TransactionType};
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::book_requests::BookRequestResponse;
use crate::presentation::http::extract::{ValidJson, double_option, parse_choice, parse_flag};
use crate::presentation::http::images::{self, ImageResponse, ImageUploadForm};

#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub condition: Condition,
    pub condition_display: &'static str,
    pub price: Option<Decimal>,
    pub transaction_type: TransactionType,
    pub transaction_type_display: &'static str,
    pub department: String,
    pub course_code: Option<String>,
    pub posted_by: Uuid,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub is_available: bool,
    pub images: Vec<ImageResponse>,
    pub primary_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookResponse {
    pub fn from_dto(cfg: &Config, dto: BookDto) -> Self {
        let b = dto.book;
        Self {
            id: b.id,
            title: b.title,
            author: b.author,
            isbn: b.isbn,
            description: b.description,
            condition: b.condition,
            condition_display: b.condition.label(),
            price: b.price,
            transaction_type: b.transaction_type,
            transaction_type_display: b.transaction_type.label(),
            department: b.department,
            course_code: b.course_code,
            posted_by: b.posted_by,
            contact_email: b.contact_email,
            contact_phone: b.contact_phone,
            is_available: b.is_available,
            primary_image: ImageResponse::primary_url(cfg, &dto.images),
            images: ImageResponse::gallery(cfg, &dto.images),
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct BookQuery {
    pub search: Option<String>,
    pub department: Option<String>,
    pub transaction_type: Option<String>,
    pub condition: Option<String>,
    pub is_available: Option<String>,
}

impl BookQuery {
    fn into_filter(self) -> Result<BookFilter, AppError> {
        Ok(BookFilter {
            search: self.search,
            department: self.department.filter(|d| !d.trim().is_empty()),
            transaction_type: parse_choice("transaction_type", self.transaction_type.as_deref())?,
            condition: parse_choice("condition", self.condition.as_deref())?,
            is_available: parse_flag(self.is_available.as_deref()),
            posted_by: None,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 200, message = "This field may not be blank."))]
    pub title: String,
    #[validate(length(min = 1, max = 200, message = "This field may not be blank."))]
    pub author: String,
    #[validate(length(max = 13))]
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub condition: Option<Condition>,
    pub price: Option<Decimal>,
    pub transaction_type: Option<TransactionType>,
    #[validate(length(min = 1, max = 100, message = "This field may not be blank."))]
    pub department: String,
    #[validate(length(max = 20))]
    pub course_code: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub contact_email: Option<String>,
    #[validate(length(max = 15))]
    pub contact_phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, max = 200, message = "This field may not be blank."))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200, message = "This field may not be blank."))]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub isbn: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub condition: Option<Condition>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Option<Decimal>>,
    pub transaction_type: Option<TransactionType>,
    pub department: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub course_code: Option<Option<String>>,
    #[validate(email(message = "Enter a valid email address."))]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contact_phone: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RequestBookBody {
    pub message: Option<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/:id",
            get(get_book).patch(update_book).delete(delete_book),
        )
        .route("/books/:id/request_book", post(request_book))
        .route("/books/:id/images", get(list_book_images).post(upload_book_image))
        .route("/books/images/:image_id", delete(delete_book_image))
        .route(
            "/books/images/:image_id/set-primary",
            post(set_primary_book_image),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/books", tag = "Books", params(BookQuery), security(()), responses((status = 200, body = [BookResponse])))]
pub async fn list_books(
    State(ctx): State<AppContext>,
    Query(q): Query<BookQuery>,
) -> Result<Json<Vec<BookResponse>>, AppError> {
    let filter = q.into_filter()?;
    let books = ctx.book_repo();
    let images = ctx.image_repo();
    let list = ListBooks {
        books: books.as_ref(),
        images: images.as_ref(),
    }
    .execute(&filter)
    .await?;
    Ok(Json(
        list.into_iter()
            .map(|dto| BookResponse::from_dto(&ctx.cfg, dto))
            .collect(),
    ))
}

#[utoipa::path(post, path = "/api/books", tag = "Books", request_body = CreateBookRequest, responses((status = 201, body = BookResponse)))]
pub async fn create_book(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    ValidJson(req): ValidJson<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), AppError> {
    let books = ctx.book_repo();
    let dto = CreateBook {
        books: books.as_ref(),
    }
    .execute(
        &user,
        BookInput {
            title: req.title,
            author: req.author,
            isbn: req.isbn,
            description: req.description,
            condition: req.condition,
            price: req.price,
            transaction_type: req.transaction_type,
            department: req.department,
            course_code: req.course_code,
            contact_email: req.contact_email,
            contact_phone: req.contact_phone,
        },
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(BookResponse::from_dto(&ctx.cfg, dto)),
    ))
}

#[utoipa::path(get, path = "/api/books/{id}", tag = "Books", params(("id" = Uuid, Path, description = "Book ID")), security(()), responses((status = 200, body = BookResponse)))]
pub async fn get_book(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookResponse>, AppError> {
    let books = ctx.book_repo();
    let images = ctx.image_repo();
    let dto = GetBook {
        books: books.as_ref(),
        images: images.as_ref(),
    }
    .execute(id)
    .await?;
    Ok(Json(BookResponse::from_dto(&ctx.cfg, dto)))
}

#[utoipa::path(patch, path = "/api/books/{id}", tag = "Books", params(("id" = Uuid, Path, description = "Book ID")), request_body = UpdateBookRequest, responses((status = 200, body = BookResponse)))]
pub async fn update_book(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidJson(req): ValidJson<UpdateBookRequest>,
) -> Result<Json<BookResponse>, AppError> {
    let books = ctx.book_repo();
    let images = ctx.image_repo();
    let changes = BookChanges {
        title: req.title,
        author: req.author,
        isbn: req.isbn,
        description: req.description,
        condition: req.condition,
        price: req.price,
        transaction_type: req.transaction_type,
        department: req.department,
        course_code: req.course_code,
        contact_email: req.contact_email,
        contact_phone: req.contact_phone,
    };
    let dto = UpdateBook {
        books: books.as_ref(),
        images: images.as_ref(),
    }
    .execute(&user.identity(), id, changes)
    .await?;
    Ok(Json(BookResponse::from_dto(&ctx.cfg, dto)))
}

#[utoipa::path(delete, path = "/api/books/{id}", tag = "Books", params(("id" = Uuid, Path, description = "Book ID")), responses((status = 204)))]
pub async fn delete_book(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let books = ctx.book_repo();
    let images = ctx.image_repo();
    let storage = ctx.storage_port();
    DeleteBook {
        books: books.as_ref(),
        images: images.as_ref(),
        storage: storage.as_ref(),
    }
    .execute(&user.identity(), id)
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/books/{id}/request_book", tag = "Books", params(("id" = Uuid, Path, description = "Book ID")), request_body = RequestBookBody, responses((status = 201, body = BookRequestResponse)))]
pub async fn request_book(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<RequestBookBody>>,
) -> Result<(StatusCode, Json<BookRequestResponse>), AppError> {
    let message = body.and_then(|Json(b)| b.message);
    let books = ctx.book_repo();
    let requests = ctx.book_request_repo();
    let request = RequestBook {
        books: books.as_ref(),
        requests: requests.as_ref(),
    }
    .execute(&user.identity(), id, message)
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(BookRequestResponse::from_request(request)),
    ))
}

#[utoipa::path(get, path = "/api/books/{id}/images", tag = "Books", params(("id" = Uuid, Path, description = "Book ID")), security(()), responses((status = 200, body = [ImageResponse])))]
pub async fn list_book_images(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    images::list_gallery(&ctx, ImageParent::Book, id).await
}

#[utoipa::path(post, path = "/api/books/{id}/images", tag = "Books", params(("id" = Uuid, Path, description = "Book ID")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses((status = 201, body = ImageResponse)))]
pub async fn upload_book_image(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImageResponse>), AppError> {
    images::upload_to_gallery(&ctx, &user, ImageParent::Book, id, multipart).await
}

#[utoipa::path(delete, path = "/api/books/images/{image_id}", tag = "Books", params(("image_id" = Uuid, Path, description = "Image ID")), responses((status = 204)))]
pub async fn delete_book_image(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(image_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    images::delete_from_gallery(&ctx, &user, ImageParent::Book, image_id).await
}

#[utoipa::path(post, path = "/api/books/images/{image_id}/set-primary", tag = "Books", params(("image_id" = Uuid, Path, description = "Image ID")), responses((status = 200, body = ImageResponse)))]
pub async fn set_primary_book_image(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(image_id): Path<Uuid>,
) -> Result<Json<ImageResponse>, AppError> {
    images::promote_in_gallery(&ctx, &user, ImageParent::Book, image_id).await
}
