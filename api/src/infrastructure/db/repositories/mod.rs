pub mod book_repository_sqlx;
pub mod book_request_repository_sqlx;
pub mod comment_repository_sqlx;
pub mod event_repository_sqlx;
pub mod image_repository_sqlx;
pub mod lost_found_repository_sqlx;
pub mod registration_repository_sqlx;
pub mod roommate_repository_sqlx;
pub mod user_repository_sqlx;
