//! Security Utilities
//!
//! Password hashing and token helpers shared by the account services.

use bcrypt::{hash, verify, DEFAULT_COST};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

/// Default bcrypt cost for password hashing
pub const DEFAULT_BCRYPT_COST: u32 = DEFAULT_COST;

/// Generate a random alphanumeric token.
///
/// Used for the plaintext half of reset-link tokens and for the random
/// component of stored avatar file names.
pub fn generate_secure_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Hash a password with bcrypt at the default cost
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash_password_with_cost(password, DEFAULT_BCRYPT_COST)
}

/// Hash a password with bcrypt at a specific cost
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against its bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

/// SHA-256 hex digest of a token for storage.
///
/// Reset tokens persist only as this digest; the plaintext lives solely in
/// the emailed link and is re-hashed for lookup when redeemed.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secure_token() {
        let token1 = generate_secure_token(32);
        let token2 = generate_secure_token(32);

        assert_eq!(token1.len(), 32);
        assert!(token1.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_password_hashing() {
        let password = "test_password_123";
        let hash = hash_password_with_cost(password, 4).unwrap();

        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_hash_token_is_deterministic() {
        let digest = hash_token("reset-token");

        assert_eq!(digest, hash_token("reset-token"));
        assert_eq!(digest.len(), 64); // SHA-256 as hex
        assert_ne!(hash_token("other-token"), digest);
    }
}
