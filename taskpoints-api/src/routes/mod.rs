/// API route handlers
///
/// - `health`: health check endpoint
/// - `auth`: registration, login, account deletion
/// - `tasks`: owner-guarded task CRUD and status toggling

pub mod auth;
pub mod health;
pub mod tasks;
