/// User model and credential store
///
/// A user row is the credential store: the only secret it holds is the
/// Argon2id password hash, and the plaintext never reaches this module.
/// Email is the login identifier and is unique exactly as stored
/// (case-sensitive, plain TEXT with a unique index); username is display
/// only and carries no uniqueness.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username TEXT NOT NULL,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// The unique index is the authoritative guard against duplicate
/// registration: the registration handler pre-checks by email for a
/// friendly conflict response, but two racing registrations are decided
/// by the constraint, and its violation surfaces as the same conflict.
///
/// # Example
///
/// ```no_run
/// use taskpoints_shared::models::user::{CreateUser, User};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     username: "jdoe".to_string(),
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User account row
///
/// Never serialized to clients as-is: the password hash stays inside the
/// trust boundary.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique numeric user id
    pub id: i64,

    /// Display name, not unique
    pub username: String,

    /// Login email, unique as stored
    pub email: String,

    /// Argon2id password hash (PHC string)
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name
    pub username: String,

    /// Login email
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns a database error on failure; a unique-constraint violation
    /// on the email column means the address is already registered and is
    /// translated to a conflict at the API boundary.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email (exact match, case-sensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Hard-deletes a user
    ///
    /// The user's tasks go with it (`ON DELETE CASCADE` on
    /// `tasks.user_id`).
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if no such user existed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
