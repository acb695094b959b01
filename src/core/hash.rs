//! Solution and Binding Hashes
//!
//! Provides the digests that key every record:
//! - Solution hash: `SHA-256(solution)`, keys a puzzle
//! - Binding hash: `SHA-256(solution ‖ solver)`, keys a commitment
//!
//! Digests travel as lowercase hex strings so clients can compute them
//! with any SHA-256 tool.

use sha2::{Digest, Sha256};

use super::account::AccountId;

/// Raw digest output (256 bits / 32 bytes).
pub type HashBytes = [u8; 32];

/// Length of a hex-encoded digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute SHA-256 of arbitrary data.
pub fn hash_bytes(data: &[u8]) -> HashBytes {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute SHA-256 of arbitrary data as lowercase hex.
pub fn hash_hex(data: &[u8]) -> String {
    hex::encode(hash_bytes(data))
}

/// Hash that identifies a puzzle by its correct answer.
pub fn solution_hash(solution: &str) -> String {
    hash_hex(solution.as_bytes())
}

/// Hash that ties an answer to one solver.
///
/// The solver's textual account id is appended to the solution with no
/// separator, so the same answer committed by two accounts yields two
/// unrelated keys.
pub fn binding_hash(solution: &str, solver: &AccountId) -> String {
    let mut hasher = Sha256::new();
    hasher.update(solution.as_bytes());
    hasher.update(solver.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Check that `s` is a well-formed lowercase hex digest.
pub fn is_digest_hex(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_hash_known_vector() {
        // sha256("abc")
        assert_eq!(
            solution_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_binding_hash_is_concatenation() {
        let solver = AccountId::new([7; 20]);
        let expected = hash_hex(format!("x{}", solver).as_bytes());
        assert_eq!(binding_hash("x", &solver), expected);
    }

    #[test]
    fn test_binding_hash_depends_on_solver() {
        let a = AccountId::new([1; 20]);
        let b = AccountId::new([2; 20]);
        assert_ne!(binding_hash("x", &a), binding_hash("x", &b));
        assert_ne!(binding_hash("x", &a), solution_hash("x"));
    }

    #[test]
    fn test_is_digest_hex() {
        assert!(is_digest_hex(&solution_hash("x")));
        assert!(!is_digest_hex(""));
        assert!(!is_digest_hex("abc"));
        assert!(!is_digest_hex(&solution_hash("x").to_uppercase()));
        assert!(!is_digest_hex(&"g".repeat(DIGEST_HEX_LEN)));
    }
}
