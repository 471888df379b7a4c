use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::bookbank::book::{BookPost, Condition, TransactionType};

#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub search: Option<String>,
    pub department: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub condition: Option<Condition>,
    pub is_available: Option<bool>,
    pub posted_by: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewBook {
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
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn list(&self, filter: &BookFilter) -> anyhow::Result<Vec<BookPost>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<BookPost>>;
    async fn isbn_in_use(&self, isbn: &str, except: Option<Uuid>) -> anyhow::Result<bool>;
    async fn create(&self, book: &NewBook) -> anyhow::Result<BookPost>;
    /// Writes every client-editable column; `is_available` and ownership are untouched.
    async fn update(&self, book: &BookPost) -> anyhow::Result<Option<BookPost>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
