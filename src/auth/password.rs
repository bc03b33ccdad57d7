/// Password hashing and verification
///
/// Bcrypt-backed credential comparison; stored hashes are opaque and
/// plaintext passwords never leave this module.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

/// Hash a password using bcrypt.
///
/// # Errors
/// Returns error if bcrypt hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its stored bcrypt hash.
///
/// Returns `false` on mismatch; an error only means bcrypt itself
/// failed (e.g. the stored hash is not a bcrypt hash).
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}
