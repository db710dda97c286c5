/// Password hashing
///
/// Argon2id via the `argon2` crate. Verification fails closed: a malformed
/// stored hash verifies as false instead of surfacing an error.
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;

use crate::error::{ApiError, ApiResult};

/// Hash a password, producing a PHC-formatted string with embedded salt
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("Secret1!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Secret1!", &hash));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("Secret1!").unwrap();

        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash_password("Secret1!").unwrap();
        let second = hash_password("Secret1!").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_verifies_as_false() {
        assert!(!verify_password("Secret1!", "not-a-phc-string"));
        assert!(!verify_password("Secret1!", ""));
    }
}
