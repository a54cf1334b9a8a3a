//! One-way credential hashing.
//!
//! Passwords are stored as bcrypt modular-crypt strings (`$2b$12$...`), which
//! embed the algorithm version, the cost and the 16-byte salt alongside the
//! digest. Verification reads those parameters back out of the stored string,
//! so hashes produced with a different cost keep verifying.

use bcrypt::{hash, verify};
use thiserror::Error;

/// bcrypt work factor used for every stored credential (2^12 rounds).
pub const HASH_COST: u32 = 12;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// The hashing backend failed, or a stored hash could not be parsed.
#[derive(Debug, Error)]
#[error("credential hashing failed: {0}")]
pub struct HashingError(#[from] bcrypt::BcryptError);

/// Hashes plaintext secrets and verifies candidates against stored hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialHasher {
    cost: u32,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self { cost: HASH_COST }
    }
}

impl CredentialHasher {
    /// Hasher using the production cost, [`HASH_COST`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with an explicit cost, clamped to bcrypt's accepted range.
    ///
    /// Only tests and tooling should lower the cost below [`HASH_COST`].
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes `plaintext` with a freshly generated salt.
    ///
    /// Two calls with the same input return different strings.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashingError> {
        Ok(hash(plaintext, self.cost)?)
    }

    /// Checks `plaintext` against a stored hash in constant time.
    ///
    /// A mismatch is `Ok(false)`; only a structurally malformed `hash` errors.
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, HashingError> {
        Ok(verify(plaintext, hash)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::with_cost(4)
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = hasher();
        let hash = hasher.hash("secret1").unwrap();
        assert!(hasher.verify("secret1", &hash).unwrap());
        assert!(!hasher.verify("secret2", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_self_describing() {
        let hash = hasher().hash("secret1").unwrap();
        assert!(hash.starts_with("$2b$04$"));
        // 7 prefix chars + 22 salt chars + 31 digest chars
        assert_eq!(hash.len(), 60);
    }

    #[test]
    fn test_cost_is_clamped() {
        assert_eq!(CredentialHasher::with_cost(1).cost(), 4);
        assert_eq!(CredentialHasher::with_cost(99).cost(), 31);
        assert_eq!(CredentialHasher::new().cost(), HASH_COST);
    }

    #[test]
    fn test_verify_uses_embedded_cost() {
        let low = CredentialHasher::with_cost(4);
        let other = CredentialHasher::with_cost(5);
        let hash = low.hash("secret1").unwrap();
        assert!(other.verify("secret1", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_errors() {
        assert!(hasher().verify("secret1", "$2b$12$tooshort").is_err());
    }
}
