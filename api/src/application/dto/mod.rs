pub mod accounts;
pub mod books;
pub mod events;
pub mod lost_found;
pub mod roommates;
