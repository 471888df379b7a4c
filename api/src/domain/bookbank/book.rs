use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

choice_enum! {
    pub enum Condition ("condition") {
        New => ("new", "New"),
        Good => ("good", "Good"),
        Fair => ("fair", "Fair"),
        Poor => ("poor", "Poor"),
    }
    default = Good;
}

choice_enum! {
    pub enum TransactionType ("transaction type") {
        Sell => ("sell", "Sell"),
        Donate => ("donate", "Donate"),
        Exchange => ("exchange", "Exchange"),
    }
    default = Sell;
}

#[derive(Debug, Clone)]
pub struct BookPost {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub condition: Condition,
    pub price: Option<Decimal>,
    pub transaction_type: TransactionType,
    pub department: String,
    pub course_code: Option<String>,
    pub posted_by: Uuid,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
