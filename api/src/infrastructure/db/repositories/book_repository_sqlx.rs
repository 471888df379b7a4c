use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::book_repository::{BookFilter, BookRepository, NewBook};
use crate::domain::bookbank::book::BookPost;
use crate::infrastructure::db::PgPool;

const BOOK_COLUMNS: &str = "id, title, author, isbn, description, condition, price, transaction_type, department, course_code, posted_by, contact_email, contact_phone, is_available, created_at, updated_at";

pub struct SqlxBookRepository {
    pub pool: PgPool,
}

impl SqlxBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn map_book(r: &PgRow) -> anyhow::Result<BookPost> {
    Ok(BookPost {
        id: r.get("id"),
        title: r.get("title"),
        author: r.get("author"),
        isbn: r.get("isbn"),
        description: r.get("description"),
        condition: r.get::<String, _>("condition").parse()?,
        price: r.get("price"),
        transaction_type: r.get::<String, _>("transaction_type").parse()?,
        department: r.get("department"),
        course_code: r.get("course_code"),
        posted_by: r.get("posted_by"),
        contact_email: r.get("contact_email"),
        contact_phone: r.get("contact_phone"),
        is_available: r.get("is_available"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

fn like(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"))
}

#[async_trait]
impl BookRepository for SqlxBookRepository {
    async fn list(&self, filter: &BookFilter) -> anyhow::Result<Vec<BookPost>> {
        let sql = format!(
            "SELECT {BOOK_COLUMNS} FROM book_posts
             WHERE ($1::TEXT IS NULL OR title ILIKE $1 OR author ILIKE $1 OR isbn ILIKE $1 OR course_code ILIKE $1)
               AND ($2::TEXT IS NULL OR department = $2)
               AND ($3::TEXT IS NULL OR transaction_type = $3)
               AND ($4::TEXT IS NULL OR condition = $4)
               AND ($5::BOOL IS NULL OR is_available = $5)
               AND ($6::UUID IS NULL OR posted_by = $6)
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(like(&filter.search))
            .bind(&filter.department)
            .bind(filter.transaction_type.map(|t| t.as_str()))
            .bind(filter.condition.map(|c| c.as_str()))
            .bind(filter.is_available)
            .bind(filter.posted_by)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_book).collect()
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<BookPost>> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM book_posts WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_book).transpose()
    }

    async fn isbn_in_use(&self, isbn: &str, except: Option<Uuid>) -> anyhow::Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM book_posts WHERE isbn = $1 AND ($2::UUID IS NULL OR id <> $2)) AS taken",
        )
        .bind(isbn)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("taken"))
    }

    async fn create(&self, book: &NewBook) -> anyhow::Result<BookPost> {
        let sql = format!(
            "INSERT INTO book_posts (title, author, isbn, description, condition, price, transaction_type,
                                     department, course_code, posted_by, contact_email, contact_phone)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {BOOK_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.isbn)
            .bind(&book.description)
            .bind(book.condition.as_str())
            .bind(book.price)
            .bind(book.transaction_type.as_str())
            .bind(&book.department)
            .bind(&book.course_code)
            .bind(book.posted_by)
            .bind(&book.contact_email)
            .bind(&book.contact_phone)
            .fetch_one(&self.pool)
            .await?;
        map_book(&row)
    }

    async fn update(&self, book: &BookPost) -> anyhow::Result<Option<BookPost>> {
        let sql = format!(
            "UPDATE book_posts SET title = $2, author = $3, isbn = $4, description = $5, condition = $6,
                    price = $7, transaction_type = $8, department = $9, course_code = $10,
                    contact_email = $11, contact_phone = $12, updated_at = now()
             WHERE id = $1
             RETURNING {BOOK_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(book.id)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.isbn)
            .bind(&book.description)
            .bind(book.condition.as_str())
            .bind(book.price)
            .bind(book.transaction_type.as_str())
            .bind(&book.department)
            .bind(&book.course_code)
            .bind(&book.contact_email)
            .bind(&book.contact_phone)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_book).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM book_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
