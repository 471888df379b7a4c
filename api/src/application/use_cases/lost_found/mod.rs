pub mod claim_item;
pub mod create_item;
pub mod delete_item;
pub mod get_item;
pub mod item_image;
pub mod list_items;
pub mod mark_found;
pub mod unclaim_item;
pub mod update_item;
