use rust_decimal::Decimal;

use crate::domain::attachments::image::Image;
use crate::domain::bookbank::book::{BookPost, Condition, TransactionType};

#[derive(Debug, Clone)]
pub struct BookDto {
    pub book: BookPost,
    pub images: Vec<Image>,
}

impl BookDto {
    pub fn primary_image(&self) -> Option<&Image> {
        self.images.iter().find(|i| i.is_primary)
    }
}

#[derive(Debug, Clone)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub condition: Option<Condition>,
    pub price: Option<Decimal>,
    pub transaction_type: Option<TransactionType>,
    pub department: String,
    pub course_code: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub condition: Option<Condition>,
    pub price: Option<Option<Decimal>>,
    pub transaction_type: Option<TransactionType>,
    pub department: Option<String>,
    pub course_code: Option<Option<String>>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<Option<String>>,
}
