//! Seeding helpers shared by the Postgres-backed repository tests.
//!
//! Each test gets a fresh database from `#[sqlx::test]`, migrated from
//! `./migrations`. Run them with `DATABASE_URL` set and `--ignored`.

#![allow(dead_code)]

use campus_api::application::ports::book_repository::{BookRepository, NewBook};
use campus_api::application::ports::event_repository::{EventRepository, NewEvent};
use campus_api::application::ports::user_repository::{NewUser, UserRepository};
use campus_api::domain::accounts::user::User;
use campus_api::domain::bookbank::book::{BookPost, Condition, TransactionType};
use campus_api::domain::noticeboard::event::{Event, EventType};
use campus_api::infrastructure::db::repositories::book_repository_sqlx::SqlxBookRepository;
use campus_api::infrastructure::db::repositories::event_repository_sqlx::SqlxEventRepository;
use campus_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

pub async fn user(pool: &PgPool, n: u32) -> User {
    SqlxUserRepository::new(pool.clone())
        .create_user(&NewUser {
            email: format!("user{n}@campus.test"),
            name: format!("User {n}"),
            mobile: format!("+1555000{n:04}"),
            address: None,
            password_hash: "not-a-real-hash".into(),
            is_staff: false,
            is_superuser: false,
        })
        .await
        .unwrap()
}

pub async fn book(pool: &PgPool, owner: &User) -> BookPost {
    SqlxBookRepository::new(pool.clone())
        .create(&NewBook {
            title: "Linear Algebra Done Right".into(),
            author: "Axler".into(),
            isbn: None,
            description: None,
            condition: Condition::Good,
            price: None,
            transaction_type: TransactionType::Sell,
            department: "Math".into(),
            course_code: None,
            posted_by: owner.id,
            contact_email: owner.email.clone(),
            contact_phone: None,
        })
        .await
        .unwrap()
}

pub async fn event(
    pool: &PgPool,
    organizer: &User,
    registration_required: bool,
    max_participants: Option<i32>,
) -> Event {
    let start = Utc::now() + Duration::days(7);
    SqlxEventRepository::new(pool.clone())
        .create(&NewEvent {
            title: "Robotics night".into(),
            description: "Bring a robot".into(),
            event_type: EventType::Workshop,
            start_datetime: start,
            end_datetime: start + Duration::hours(2),
            location: "Lab 3".into(),
            location_url: None,
            organizer: organizer.id,
            is_online: false,
            meeting_link: None,
            max_participants,
            is_free: true,
            price: Decimal::ZERO,
            registration_required,
            registration_deadline: None,
            is_approved: true,
        })
        .await
        .unwrap()
}
