pub mod book_repository;
pub mod book_request_repository;
pub mod comment_repository;
pub mod event_repository;
pub mod image_repository;
pub mod lost_found_repository;
pub mod registration_repository;
pub mod roommate_repository;
pub mod storage_port;
pub mod user_repository;
