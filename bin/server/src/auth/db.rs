//! Postgres repositories for users and sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruit_portal_core::{Result, UserId};
use recruit_portal_platform_access::{
    DirectoryError, Role, Session, SessionStore, SessionStoreError, User, UserStore,
};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// Row type for user queries.
#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    picture: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_user(self) -> std::result::Result<User, DirectoryError> {
        let id = UserId::from_str(&self.id).map_err(|e| DirectoryError::ReadFailed {
            details: format!("invalid user id '{}': {e}", self.id),
        })?;
        let role = Role::from_str(&self.role).map_err(|e| DirectoryError::ReadFailed {
            details: format!("user {id}: {e}"),
        })?;
        Ok(User::with_all_fields(
            id,
            self.name,
            self.email,
            self.picture,
            role,
            self.created_at,
            self.updated_at,
        ))
    }
}

fn read_failed(e: sqlx::Error) -> DirectoryError {
    DirectoryError::ReadFailed {
        details: e.to_string(),
    }
}

fn write_failed(e: sqlx::Error) -> DirectoryError {
    DirectoryError::WriteFailed {
        details: e.to_string(),
    }
}

const USER_COLUMNS: &str = "id, name, email, picture, role, created_at, updated_at";

/// Repository for user operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        predicate: &str,
        value: String,
    ) -> Result<Option<User>, DirectoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE {predicate}"))
                .bind(value)
                .fetch_optional(&self.pool)
                .await
                .map_err(read_failed)?;

        match row {
            Some(r) => Ok(Some(r.try_into_user()?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        self.fetch_one_where("email = $1", email.to_string()).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DirectoryError> {
        self.fetch_one_where("id = $1", id.to_string()).await
    }

    async fn insert_if_absent(&self, user: &User) -> Result<bool, DirectoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, picture, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(user.id().to_string())
        .bind(user.name())
        .bind(user.email())
        .bind(user.picture())
        .bind(user.role().as_str())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(write_failed)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_role_if(
        &self,
        id: UserId,
        from: Role,
        to: Role,
    ) -> Result<bool, DirectoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = $3, updated_at = NOW()
            WHERE id = $1 AND role = $2
            "#,
        )
        .bind(id.to_string())
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(&self.pool)
        .await
        .map_err(write_failed)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_if_role(&self, id: UserId, role: Role) -> Result<bool, DirectoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1 AND role = $2
            "#,
        )
        .bind(id.to_string())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(write_failed)?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, DirectoryError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at"
        ))
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(read_failed)?;

        into_users(rows)
    }

    async fn list_all(&self) -> Result<Vec<User>, DirectoryError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(read_failed)?;

        into_users(rows)
    }
}

fn into_users(rows: Vec<UserRow>) -> Result<Vec<User>, DirectoryError> {
    let users = rows
        .into_iter()
        .map(UserRow::try_into_user)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(users)
}

/// Repository for session operations.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Creates a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn session_write_failed(e: sqlx::Error) -> SessionStoreError {
    SessionStoreError::WriteFailed {
        details: e.to_string(),
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn upsert(&self, session: &Session) -> Result<(), SessionStoreError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (user_id, token, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET token = EXCLUDED.token, created_at = EXCLUDED.created_at
            "#,
        )
        .bind(session.user_id().to_string())
        .bind(session.token())
        .bind(session.created_at())
        .execute(&self.pool)
        .await
        .map_err(session_write_failed)?;

        Ok(())
    }

    async fn delete(&self, user_id: UserId, token: &str) -> Result<bool, SessionStoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE user_id = $1 AND token = $2
            "#,
        )
        .bind(user_id.to_string())
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(session_write_failed)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, SessionStoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE created_at < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(session_write_failed)?;

        Ok(result.rows_affected())
    }
}
