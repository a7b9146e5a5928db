/// Argon2id password hashing
///
/// The plaintext password exists only for the duration of a hash or
/// verify call; it is never stored, logged, or compared by equality.
/// What gets persisted is a PHC string carrying the algorithm, the work
/// parameters, a per-call random salt, and the digest, so parameter
/// changes only affect hashes created after the change.
///
/// Work factor: 64 MiB memory, 3 passes, 4 lanes, 32-byte digest.
///
/// # Example
///
/// ```
/// use taskpoints_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stored = hash_password("hunter2-but-longer")?;
/// assert!(verify_password("hunter2-but-longer", &stored)?);
/// assert!(!verify_password("hunter2", &stored)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Failures from hashing or verifying
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Hashing the plaintext failed
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// The verifier failed for a reason other than a wrong password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// The stored value is not a parseable PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a plaintext password with a fresh random salt
///
/// Two calls with the same input produce different PHC strings; only
/// [`verify_password`] can relate a plaintext to a stored hash.
///
/// # Errors
///
/// `PasswordError::HashError` when parameter construction or digest
/// generation fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536)
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("bad params: {e}")))?;

    let hasher = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let phc = hasher
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("hashing failed: {e}")))?;

    Ok(phc.to_string())
}

/// Checks a plaintext password against a stored PHC string
///
/// The comparison inside the verifier is constant-time. A wrong password
/// is the `Ok(false)` outcome, not an error; errors mean the stored hash
/// itself is unusable.
///
/// # Errors
///
/// `PasswordError::InvalidHash` when the stored value does not parse as a
/// PHC string, `PasswordError::VerifyError` for any other verifier
/// failure.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| PasswordError::InvalidHash(format!("unparseable hash: {e}")))?;

    // The verifier reads algorithm and parameters out of the PHC string
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phc_string_carries_algorithm_and_params() {
        let stored = hash_password("a password").unwrap();

        assert!(stored.starts_with("$argon2id$"));
        for part in ["v=19", "m=65536", "t=3", "p=4"] {
            assert!(stored.contains(part), "missing {part} in {stored}");
        }
    }

    #[test]
    fn same_plaintext_hashes_differently() {
        let first = hash_password("repeat-me").unwrap();
        let second = hash_password("repeat-me").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn correct_password_verifies() {
        let stored = hash_password("open sesame").unwrap();
        assert!(verify_password("open sesame", &stored).unwrap());
    }

    #[test]
    fn wrong_password_is_ok_false() {
        let stored = hash_password("open sesame").unwrap();
        assert!(!verify_password("open barley", &stored).unwrap());
    }

    #[test]
    fn empty_password_does_not_verify() {
        let stored = hash_password("something").unwrap();
        assert!(!verify_password("", &stored).unwrap());
    }

    #[test]
    fn garbage_stored_value_is_invalid_hash() {
        let result = verify_password("whatever", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordError::InvalidHash(_))));
    }

    #[test]
    fn truncated_phc_string_errors() {
        assert!(verify_password("whatever", "$argon2id$v=19").is_err());
    }

    #[test]
    fn verifies_awkward_plaintexts() {
        for password in [
            "with spaces",
            "sym&ols!@#$%",
            "unicode-密码-パスワード",
            "a-rather-long-password-nobody-would-actually-type-0123456789",
        ] {
            let stored = hash_password(password).unwrap();
            assert!(
                verify_password(password, &stored).unwrap(),
                "failed for {password:?}"
            );
        }
    }
}
