pub mod create_comment;
pub mod delete_comment;
pub mod get_comment;
pub mod list_comments;
pub mod list_event_comments;
pub mod update_comment;
