pub mod decide_request;
pub mod delete_request;
pub mod get_request;
pub mod list_requests;
