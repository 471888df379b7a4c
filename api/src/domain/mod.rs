#[macro_use]
pub mod choices;

pub mod accounts;
pub mod attachments;
pub mod bookbank;
pub mod lostfound;
pub mod noticeboard;
pub mod roommate;
