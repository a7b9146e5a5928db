/// API error taxonomy
///
/// Every handler returns `Result<T, ApiError>`; a single `IntoResponse`
/// impl turns each variant into a status code plus a structured JSON
/// body. Internal failures (SQL, hashing) are logged through tracing and
/// replaced with a generic body before they reach a client. Nothing in
/// this module retries anything.
///
/// # Example
///
/// ```ignore
/// use taskpoints_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     let row = load_row().await?; // sqlx::Error converts automatically
///     Ok(Json(row))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use taskpoints_shared::auth::{jwt::JwtError, middleware::AuthError, password::PasswordError};

/// Handler result alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Everything a handler can fail with, one variant per status class
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 401, wrong credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 403, request refused before any handler ran
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 404, covers both absent and not-owned resources
    #[error("Not found: {0}")]
    NotFound(String),

    /// 409, duplicate email and friends
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 422, per-field validation failures
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<ValidationErrorDetail>),

    /// 500, logged in full, returned in generic form
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// One failed field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Which field failed
    pub field: String,

    /// What was wrong with it
    pub message: String,
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code, e.g. `conflict`
    pub error: String,

    /// Human-readable message
    pub message: String,

    /// Field details, present only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Full detail to the log, generic phrase to the client
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: code.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Storage-layer failures
///
/// The unique index on `users.email` is the final arbiter of duplicate
/// registration; its violation maps to the same 409 the handler's
/// pre-check produces, so a race between two registrations is
/// indistinguishable from a plain duplicate.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.constraint() {
                Some(name) if name.contains("email") => {
                    ApiError::Conflict("Email already registered".to_string())
                }
                // Any other constraint name is an internal identifier; it
                // reaches the log through the InternalError arm, never a
                // response body.
                Some(name) => {
                    ApiError::InternalError(format!("Constraint violation: {name}: {db_err}"))
                }
                None => ApiError::InternalError(format!("Database error: {db_err}")),
            },
            other => ApiError::InternalError(format!("Database error: {other}")),
        }
    }
}

/// Hashing failures say nothing about the credentials, so they are
/// always internal
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {err}"))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => {
                ApiError::InternalError(format!("Token creation failed: {msg}"))
            }
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            _ => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

/// `AuthError` has its own `IntoResponse` for the middleware path; this
/// conversion serves handlers that call `authenticate` directly and must
/// keep the same status mapping
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => {
                ApiError::Forbidden("Access denied. No bearer token provided.".to_string())
            }
            AuthError::MalformedToken => {
                ApiError::Forbidden("Malformed authorization header.".to_string())
            }
            AuthError::InvalidToken(_) | AuthError::ExpiredToken => {
                ApiError::BadRequest("Invalid token.".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_the_message() {
        let err = ApiError::Conflict("Email already registered".to_string());
        assert_eq!(err.to_string(), "Conflict: Email already registered");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn validation_display_counts_fields() {
        let err = ApiError::ValidationError(vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Password is required".to_string(),
            },
        ]);

        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn variants_map_to_expected_statuses() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                ApiError::ValidationError(vec![]),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::InternalError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn row_not_found_becomes_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    /// Minimal `DatabaseError` carrying just a constraint name
    #[derive(Debug)]
    struct StubDbError(&'static str);

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "constraint {} violated", self.0)
        }
    }

    impl std::error::Error for StubDbError {}

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.0)
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn email_constraint_violation_becomes_409() {
        let err: ApiError = sqlx::Error::Database(Box::new(StubDbError("users_email_key"))).into();

        match err {
            ApiError::Conflict(msg) => assert_eq!(msg, "Email already registered"),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn foreign_key_violation_stays_internal() {
        // Reachable with a valid token whose account was deleted: the
        // task insert trips tasks_user_id_fkey. The constraint name must
        // go to the log, not the client.
        let err: ApiError =
            sqlx::Error::Database(Box::new(StubDbError("tasks_user_id_fkey"))).into();

        match &err {
            ApiError::InternalError(msg) => assert!(msg.contains("tasks_user_id_fkey")),
            other => panic!("expected InternalError, got {other:?}"),
        }

        // The response side is the generic 500, never a 409 echoing the
        // constraint name
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn auth_errors_keep_the_gate_statuses() {
        let err: ApiError = AuthError::MissingToken.into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = AuthError::MalformedToken.into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = AuthError::ExpiredToken.into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
