use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::user_repository::{NewUser, UserRepository};
use crate::domain::accounts::user::{Profile, User};
use crate::infrastructure::db::PgPool;

const USER_COLUMNS: &str = "id, email, name, mobile, address, is_active, is_staff, is_superuser, date_joined, last_login";

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_user))
    }
}

fn map_user(r: &PgRow) -> User {
    User {
        id: r.get("id"),
        email: r.get("email"),
        name: r.get("name"),
        mobile: r.get("mobile"),
        address: r.get("address"),
        is_active: r.get("is_active"),
        is_staff: r.get("is_staff"),
        is_superuser: r.get("is_superuser"),
        date_joined: r.get("date_joined"),
        last_login: r.get("last_login"),
    }
}

fn map_profile(r: &PgRow) -> Profile {
    Profile {
        bio: r.get("bio"),
        department: r.get("department"),
        student_id: r.get("student_id"),
        profile_picture: r.get("profile_picture"),
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User> {
        let sql = format!(
            "INSERT INTO users (email, name, mobile, address, password_hash, is_staff, is_superuser)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.mobile)
            .bind(&user.address)
            .bind(&user.password_hash)
            .bind(user.is_staff)
            .bind(user.is_superuser)
            .fetch_one(&self.pool)
            .await?;
        Ok(map_user(&row))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_user))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.find_one("lower(email)", &email.to_lowercase()).await
    }

    async fn find_by_mobile(&self, mobile: &str) -> anyhow::Result<Option<User>> {
        self.find_one("mobile", mobile).await
    }

    async fn password_hash(&self, id: Uuid) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("SELECT password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("password_hash")))
    }

    async fn list_users(&self, search: Option<&str>) -> anyhow::Result<Vec<User>> {
        let like = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE ($1::TEXT IS NULL OR email ILIKE $1 OR name ILIKE $1 OR mobile ILIKE $1)
             ORDER BY date_joined DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(like)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_user).collect())
    }

    async fn update_user(&self, user: &User) -> anyhow::Result<Option<User>> {
        let sql = format!(
            "UPDATE users SET name = $2, mobile = $3, address = $4,
                    is_active = $5, is_staff = $6, is_superuser = $7
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.mobile)
            .bind(&user.address)
            .bind(user.is_active)
            .bind(user.is_staff)
            .bind(user.is_superuser)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_user))
    }

    async fn set_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET last_login = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn get_profile(&self, user_id: Uuid) -> anyhow::Result<Profile> {
        let row = sqlx::query(
            "SELECT bio, department, student_id, profile_picture FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_profile).unwrap_or_default())
    }

    async fn save_profile(&self, user_id: Uuid, profile: &Profile) -> anyhow::Result<Profile> {
        let row = sqlx::query(
            r#"INSERT INTO user_profiles (user_id, bio, department, student_id, profile_picture)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (user_id) DO UPDATE SET
                   bio = EXCLUDED.bio,
                   department = EXCLUDED.department,
                   student_id = EXCLUDED.student_id,
                   profile_picture = EXCLUDED.profile_picture,
                   updated_at = now()
               RETURNING bio, department, student_id, profile_picture"#,
        )
        .bind(user_id)
        .bind(&profile.bio)
        .bind(&profile.department)
        .bind(&profile.student_id)
        .bind(&profile.profile_picture)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_profile(&row))
    }
}
