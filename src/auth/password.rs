/// Password Hashing and Verification
///
/// bcrypt one-way hashing. The session layer only ever sees the digest;
/// plaintext passwords are never stored or logged.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

/// Hash a plaintext password.
///
/// # Errors
/// Returns an internal error if bcrypt hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

/// Verify a plaintext password against its stored digest.
///
/// # Errors
/// Returns an internal error if the digest is not a valid bcrypt hash.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AppError> {
    verify(password, digest)
        .map_err(|e| AppError::Internal(format!("password verification failed: {}", e)))
}
