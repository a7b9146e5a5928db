/// Database models for TaskPoints
///
/// # Models
///
/// - `user`: user accounts (the credential store)
/// - `task`: user-owned tasks with owner-scoped CRUD
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
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
