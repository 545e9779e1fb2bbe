//! Password hashing for admin accounts.
//!
//! Bcrypt with a per-call random salt: hashing the same plaintext twice
//! yields different digests, both of which verify.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{BistroError, BistroResult};

/// Hash a plaintext password into a bcrypt digest.
pub fn hash_password(plaintext: &str) -> BistroResult<String> {
    hash(plaintext, DEFAULT_COST)
        .map_err(|e| BistroError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a plaintext password against a stored digest.
///
/// A malformed digest verifies false rather than erroring: a corrupt
/// stored hash must never crash a login attempt.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    verify(plaintext, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_roundtrip() {
        let digest = hash_password("admin123").unwrap();
        assert_ne!(digest, "admin123");
        assert!(verify_password("admin123", &digest));
        assert!(!verify_password("wrong", &digest));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same-password", &a));
        assert!(verify_password("same-password", &b));
    }

    #[test]
    fn test_malformed_digest_verifies_false() {
        assert!(!verify_password("admin123", "not-a-bcrypt-digest"));
        assert!(!verify_password("admin123", ""));
    }
}
