/// Authentication endpoints
///
/// - `POST /api/auth/register` - register and receive a token
/// - `POST /api/auth/login` - log in and receive a token
/// - `DELETE /api/auth/account` - delete the authenticated account
///
/// Registration and login are the only places plaintext passwords exist;
/// both hand the plaintext straight to the hasher/verifier and drop it.
/// Tokens are minted here and nowhere else.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use taskpoints_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for register and login: a message plus the bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Human-readable outcome
    pub message: String,

    /// Signed bearer token, opaque to the client
    pub token: String,
}

/// Response for account deletion
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Maps validator output into the API's validation error shape
pub(crate) fn validation_errors(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}

/// Register a new user
///
/// Hashes the password, stores the account, and returns a fresh 1-hour
/// token so the client is logged in immediately.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// { "username": "jdoe", "email": "user@example.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: email already registered (pre-check or unique
///   constraint, whichever fires first)
/// - `422 Unprocessable Entity`: missing or malformed fields
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    req.validate().map_err(validation_errors)?;

    // Friendly pre-check; the unique index on users.email is the final
    // arbiter when two registrations race, and its violation maps to the
    // same 409 in From<sqlx::Error>.
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let claims = jwt::Claims::new(user.id, &user.email);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            message: "User registered successfully.".to_string(),
            token,
        }),
    ))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: no account with that email
/// - `401 Unauthorized`: wrong password
///
/// The two cases are deliberately distinguished. A uniform 401 would
/// resist account enumeration; if that matters for a deployment, collapse
/// the 404 arm here.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate().map_err(validation_errors)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let claims = jwt::Claims::new(user.id, &user.email);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(TokenResponse {
        message: "Login successful.".to_string(),
        token,
    }))
}

/// Deletes the authenticated user's account
///
/// Bound to the identity the auth gate verified; no client-supplied id is
/// accepted. The user's tasks are removed by the cascade on
/// `tasks.user_id`.
///
/// # Endpoint
///
/// ```text
/// DELETE /api/auth/account
/// Authorization: Bearer <token>
/// ```
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = User::delete(&state.db, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = auth.user_id, "account deleted");

    Ok(Json(MessageResponse {
        message: "Account deleted successfully.".to_string(),
    }))
}
