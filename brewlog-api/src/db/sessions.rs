//! Session queries

use brewlog_common::models::User;
use brewlog_common::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{fmt_ts, parse_ts, parse_ts_opt, parse_uuid};

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: parse_uuid(&row.get::<String, _>(0))?,
        username: row.get(1),
        email: row.get(2),
        password_hash: row.get(3),
        display_name: row.get(4),
        created_at: parse_ts(&row.get::<String, _>(5))?,
        updated_at: parse_ts(&row.get::<String, _>(6))?,
        deleted_at: parse_ts_opt(row.get::<Option<String>, _>(7))?,
    })
}

/// Insert a new session row
pub async fn create(
    pool: &SqlitePool,
    token: &str,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(token)
    .bind(user_id.to_string())
    .bind(fmt_ts(Utc::now()))
    .bind(fmt_ts(expires_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Resolve a session token to its user.
///
/// Returns None for unknown tokens, expired sessions, and sessions whose
/// user has been soft-deleted.
pub async fn lookup(pool: &SqlitePool, token: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT u.id, u.username, u.email, u.password_hash, u.display_name,
               u.created_at, u.updated_at, u.deleted_at,
               s.expires_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = ? AND u.deleted_at IS NULL
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let expires_at = parse_ts(&row.get::<String, _>(8))?;
    if expires_at <= Utc::now() {
        return Ok(None);
    }

    user_from_row(&row).map(Some)
}

/// Remove a session row (logout)
pub async fn delete(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}
