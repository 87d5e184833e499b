//! Password hashing for `users.password_hash`.
//!
//! The column is unbounded `text` and only ever stores a PHC string produced
//! by Argon2id.

use argon2::{
    Algorithm, Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Refused to hash an empty password.
    #[error("password must not be empty")]
    Empty,

    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// The stored value is not a PHC string.
    #[error("stored password is not a valid hash")]
    InvalidHash,

    /// Verification failed for a reason other than a mismatch.
    #[error("failed to verify password: {0}")]
    Verify(String),
}

/// Hashes a plaintext password with Argon2id.
///
/// # Errors
///
/// Returns [`PasswordError::Empty`] for an empty password and
/// [`PasswordError::Hash`] if the hasher fails.
///
/// # Example
///
/// ```
/// use ledgerly_core::identity::hash_password;
///
/// let hash = hash_password("correct horse").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }

    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .to_string())
}

/// Checks a plaintext password against a stored hash.
///
/// Returns `Ok(false)` on a mismatch.
///
/// # Errors
///
/// Returns [`PasswordError::InvalidHash`] if `hash` is not a PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}

/// Returns true if a stored hash was produced by something other than Argon2id.
#[must_use]
pub fn needs_rehash(hash: &str) -> bool {
    PasswordHash::new(hash).map_or(true, |parsed| {
        parsed.algorithm != Algorithm::Argon2id.ident()
    })
}
