pub mod book;
pub mod request;
