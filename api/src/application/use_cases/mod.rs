pub mod accounts;
pub mod auth;
pub mod book_requests;
pub mod books;
pub mod comments;
pub mod common;
pub mod events;
pub mod images;
pub mod lost_found;
pub mod registrations;
pub mod roommates;
