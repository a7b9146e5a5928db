/// JWT issuance and validation
///
/// Tokens are HS256-signed bearer credentials carrying the authenticated
/// user's identity. They are stateless: nothing is recorded server-side at
/// issuance and there is no revocation list, so a token dies only at its
/// expiry, exactly one hour after it was minted. Rotating the signing
/// secret invalidates every outstanding token at once.
///
/// The token string is opaque to clients; its claim layout is a private
/// contract between this module and the auth gate.
///
/// # Example
///
/// ```
/// use taskpoints_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, "user@example.com");
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer embedded in and required of every token
const ISSUER: &str = "taskpoints";

/// Fixed token lifetime: one hour from issuance
pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token failed signature or structural validation
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user id)
/// - `iss`: Issuer (always "taskpoints")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp (`iat` + 1 hour)
/// - `jti`: Unique token id, so two logins in the same second still
///   produce distinct tokens
///
/// # Custom Claims
///
/// - `email`: Subject email at issuance time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: i64,

    /// Subject email
    pub email: String,

    /// Issuer - always "taskpoints"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token id
    pub jti: Uuid,
}

impl Claims {
    /// Creates claims for a user, expiring exactly one hour from now
    pub fn new(user_id: i64, email: &str) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            email: email.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECONDS)).timestamp(),
            jti: Uuid::new_v4(),
        }
    }

    /// Creates claims with an explicit lifetime (negative for tests that
    /// need an already-expired token)
    pub fn with_ttl(user_id: i64, email: &str, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            email: email.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
        }
    }

    /// Checks if the token is expired; the expiry instant itself counts
    /// as expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string using HS256
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the HS256 signature, the issuer, and the expiry with zero
/// leeway: a token presented at exactly its expiry instant is rejected.
///
/// # Errors
///
/// - `JwtError::Expired` for an expired token
/// - `JwtError::InvalidIssuer` for a wrong issuer
/// - `JwtError::ValidationError` for a bad signature or malformed token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    // The decoder treats exp == now as still valid; the contract here is
    // that the expiry instant itself is already expired.
    if token_data.claims.is_expired() {
        return Err(JwtError::Expired);
    }

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_expire_exactly_one_hour_after_issuance() {
        let claims = Claims::new(1, "a@x.com");

        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new(42, "user@example.com");
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, 42);
        assert_eq!(validated.email, "user@example.com");
        assert_eq!(validated.iss, "taskpoints");
        assert_eq!(validated.exp, claims.exp);
    }

    #[test]
    fn test_tokens_for_same_user_are_distinct() {
        let t1 = create_token(&Claims::new(7, "a@x.com"), SECRET).unwrap();
        let t2 = create_token(&Claims::new(7, "a@x.com"), SECRET).unwrap();

        assert_ne!(t1, t2);
        assert!(validate_token(&t1, SECRET).is_ok());
        assert!(validate_token(&t2, SECRET).is_ok());
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = create_token(&Claims::new(1, "a@x.com"), "secret1-long-enough-for-tests!!")
            .expect("Should create token");

        let result = validate_token(&token, "wrong-secret-long-enough-for-test");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_ttl(1, "a@x.com", Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_token_at_expiry_instant_is_rejected() {
        // exp == now: the decoder lets this through, the boundary check
        // must not
        let claims = Claims::with_ttl(1, "a@x.com", Duration::zero());
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_token_shortly_before_expiry_is_accepted() {
        let claims = Claims::with_ttl(1, "a@x.com", Duration::seconds(5));
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, SECRET).is_ok());
    }

    #[test]
    fn test_validate_garbage_token() {
        let result = validate_token("not.a.token", SECRET);
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_validate_wrong_issuer() {
        let mut claims = Claims::new(1, "a@x.com");
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(
            validate_token(&token, SECRET),
            Err(JwtError::InvalidIssuer)
        ));
    }
}
