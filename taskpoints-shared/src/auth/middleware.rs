/// Authentication gate for Axum
///
/// Every protected request passes through this gate before any handler
/// runs. The gate walks a fixed sequence of checks:
///
/// 1. no `Authorization` header → [`AuthError::MissingToken`]
/// 2. header not of the form `Bearer <token>` → [`AuthError::MalformedToken`]
/// 3. bad signature → [`AuthError::InvalidToken`]; past expiry →
///    [`AuthError::ExpiredToken`]
/// 4. valid → an [`AuthContext`] is inserted into request extensions and
///    control passes downstream
///
/// Verification is local cryptographic computation only: the gate never
/// touches the database or the network and mutates no persisted state.
/// Invalid and expired tokens are distinct reasons internally but share a
/// uniform client-facing message.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskpoints_shared::auth::middleware::{jwt_auth_middleware, AuthContext};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     format!("user {}", auth.user_id)
/// }
///
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(|req, next| {
///         jwt_auth_middleware("your-jwt-secret".to_string(), req, next)
///     }));
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::jwt::{validate_token, JwtError};

/// Verified identity attached to request extensions by the gate
///
/// Handlers extract it with Axum's `Extension` extractor; the resource
/// owner guard scopes every task operation to `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: i64,

    /// Email the token was issued for
    pub email: String,
}

/// Rejection reasons for the auth gate
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header on the request
    #[error("Missing bearer token")]
    MissingToken,

    /// Authorization header present but not `Bearer <token>`
    #[error("Malformed authorization header")]
    MalformedToken,

    /// Signature or structural validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token expiry is in the past
    #[error("Token expired")]
    ExpiredToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Missing and malformed credentials are told apart in the body;
        // invalid and expired collapse to one uniform client message.
        let (status, message) = match self {
            AuthError::MissingToken => (
                StatusCode::FORBIDDEN,
                "Access denied. No bearer token provided.",
            ),
            AuthError::MalformedToken => {
                (StatusCode::FORBIDDEN, "Malformed authorization header.")
            }
            AuthError::InvalidToken(ref reason) => {
                tracing::debug!(reason, "rejected invalid token");
                (StatusCode::BAD_REQUEST, "Invalid token.")
            }
            AuthError::ExpiredToken => {
                tracing::debug!("rejected expired token");
                (StatusCode::BAD_REQUEST, "Invalid token.")
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Extracts the raw token from an `Authorization: Bearer <token>` header
///
/// # Errors
///
/// `MissingToken` if the header is absent, `MalformedToken` if it is not
/// readable ASCII, not a Bearer credential, or the token part is empty
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    // A header that is present but not readable ASCII is malformed, not
    // missing
    let auth_header = auth_header
        .to_str()
        .map_err(|_| AuthError::MalformedToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedToken)?;

    if token.is_empty() {
        return Err(AuthError::MalformedToken);
    }

    Ok(token)
}

/// Runs the full gate over a request's headers
///
/// Pure and synchronous: header parsing plus local signature/expiry
/// verification, nothing else.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;

    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::ExpiredToken,
        other => AuthError::InvalidToken(other.to_string()),
    })?;

    Ok(AuthContext {
        user_id: claims.sub,
        email: claims.email,
    })
}

/// JWT authentication middleware
///
/// Validates the bearer token and injects [`AuthContext`] into request
/// extensions on success.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_context = authenticate(req.headers(), &secret)?;
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
