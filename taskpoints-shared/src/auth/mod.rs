/// Authentication utilities
///
/// This module provides the security primitives for TaskPoints:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT issuance and validation (HS256, 1-hour lifetime)
/// - [`middleware`]: the auth gate protecting every task route
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations,
///   random per-call salt
/// - **JWT Tokens**: HS256 signing, fixed 1-hour expiry, zero validation
///   leeway
/// - **Constant-time Comparison**: password verification never compares
///   hashes by equality
///
/// # Example
///
/// ```no_run
/// use taskpoints_shared::auth::password::{hash_password, verify_password};
/// use taskpoints_shared::auth::jwt::{create_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = create_token(&Claims::new(1, "user@example.com"), "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
