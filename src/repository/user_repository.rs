use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{CreateUserRequest, Role, UpdateProfileRequest, User},
    error::{AppError, Result},
    repository::UserRepository,
};

#[derive(FromRow)]
struct UserRow {
    email: String,
    name: String,
    photo_url: Option<String>,
    role: String,
    created_at: NaiveDateTime,
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: UserRow) -> Result<User> {
        Ok(User {
            email: row.email,
            name: row.name,
            photo_url: row.photo_url,
            role: Self::parse_role(&row.role)?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }

    fn parse_role(s: &str) -> Result<Role> {
        match s {
            "participant" => Ok(Role::Participant),
            "admin" => Ok(Role::Admin),
            _ => Err(AppError::Database(format!("Invalid role: {}", s))),
        }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, request: CreateUserRequest) -> Result<User> {
        if self.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let role = request.role.unwrap_or(Role::Participant);
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO users (email, name, photo_url, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.email)
        .bind(&request.name)
        .bind(&request.photo_url)
        .bind(role.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_email(&request.email).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created user".to_string())
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT email, name, photo_url, role, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_user(r)?)),
            None => Ok(None),
        }
    }

    async fn update_profile(&self, email: &str, update: UpdateProfileRequest) -> Result<User> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?, name),
                photo_url = COALESCE(?, photo_url)
            WHERE email = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.photo_url)
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
