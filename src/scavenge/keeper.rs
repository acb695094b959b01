//! Record Repository
//!
//! Maps puzzles and commitments onto two disjoint namespaces of the keyed
//! store and handles their encoding:
//!
//! ```text
//! sk-<solution hash>  →  Puzzle
//! ck-<binding hash>   →  Commitment
//! ```

use crate::store::{decode_record, encode_record, CodecError, KeyValueStore};

use super::errors::{ScavengeError, ScavengeResult};
use super::types::{Commitment, Puzzle, RecordKind};

/// Namespace for puzzles.
pub const PUZZLE_PREFIX: &[u8] = b"sk-";

/// Namespace for commitments.
pub const COMMITMENT_PREFIX: &[u8] = b"ck-";

/// Build the store key for a puzzle.
pub fn puzzle_key(solution_hash: &str) -> Vec<u8> {
    [PUZZLE_PREFIX, solution_hash.as_bytes()].concat()
}

/// Build the store key for a commitment.
pub fn commitment_key(binding_hash: &str) -> Vec<u8> {
    [COMMITMENT_PREFIX, binding_hash.as_bytes()].concat()
}

/// An encoded record ready to be written.
///
/// Encoding is the only fallible step of a write, so the engine prepares
/// writes before moving funds and applies them afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a prepared write does nothing until applied"]
pub struct PendingWrite {
    key: Vec<u8>,
    value: Vec<u8>,
}

/// Typed access to scavenge records.
#[derive(Debug)]
pub struct Keeper<S> {
    store: S,
}

impl<S: KeyValueStore> Keeper<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable underlying store (maintenance and tests).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Release the store.
    pub fn into_inner(self) -> S {
        self.store
    }

    // =========================================================================
    // PUZZLES
    // =========================================================================

    /// Load a puzzle by solution hash.
    pub fn get_puzzle(&self, solution_hash: &str) -> ScavengeResult<Puzzle> {
        let bytes = self
            .store
            .get(&puzzle_key(solution_hash))
            .ok_or_else(|| ScavengeError::puzzle_not_found(solution_hash))?;
        decode_puzzle(solution_hash, &bytes)
    }

    /// Does any value occupy the puzzle's key?
    pub fn has_puzzle(&self, solution_hash: &str) -> bool {
        self.store.has(&puzzle_key(solution_hash))
    }

    /// Encode a puzzle without writing it.
    pub fn prepare_puzzle(&self, puzzle: &Puzzle) -> ScavengeResult<PendingWrite> {
        let value = encode_record(puzzle).map_err(|source| ScavengeError::Encode {
            kind: RecordKind::Puzzle,
            key: puzzle.solution_hash.clone(),
            source,
        })?;
        Ok(PendingWrite {
            key: puzzle_key(&puzzle.solution_hash),
            value,
        })
    }

    /// Overwrite a puzzle under its solution hash.
    pub fn set_puzzle(&mut self, puzzle: &Puzzle) -> ScavengeResult<()> {
        let write = self.prepare_puzzle(puzzle)?;
        self.apply(write);
        Ok(())
    }

    /// Remove a puzzle. Not used by the protocol.
    pub fn delete_puzzle(&mut self, solution_hash: &str) -> bool {
        self.store.delete(&puzzle_key(solution_hash))
    }

    /// All puzzles in key order. Each call takes a fresh scan.
    pub fn puzzles(&self) -> impl Iterator<Item = ScavengeResult<Puzzle>> + '_ {
        self.store.prefix_iter(PUZZLE_PREFIX).map(|(key, value)| {
            let hash = key_suffix(&key, PUZZLE_PREFIX);
            decode_puzzle(&hash, &value)
        })
    }

    // =========================================================================
    // COMMITMENTS
    // =========================================================================

    /// Load a commitment by binding hash.
    pub fn get_commitment(&self, binding_hash: &str) -> ScavengeResult<Commitment> {
        let bytes = self
            .store
            .get(&commitment_key(binding_hash))
            .ok_or_else(|| ScavengeError::commitment_not_found(binding_hash))?;
        decode_commitment(binding_hash, &bytes)
    }

    /// Does any value occupy the commitment's key?
    pub fn has_commitment(&self, binding_hash: &str) -> bool {
        self.store.has(&commitment_key(binding_hash))
    }

    /// Encode a commitment without writing it.
    pub fn prepare_commitment(&self, commitment: &Commitment) -> ScavengeResult<PendingWrite> {
        let value = encode_record(commitment).map_err(|source| ScavengeError::Encode {
            kind: RecordKind::Commitment,
            key: commitment.binding_hash.clone(),
            source,
        })?;
        Ok(PendingWrite {
            key: commitment_key(&commitment.binding_hash),
            value,
        })
    }

    /// Overwrite a commitment under its binding hash.
    pub fn set_commitment(&mut self, commitment: &Commitment) -> ScavengeResult<()> {
        let write = self.prepare_commitment(commitment)?;
        self.apply(write);
        Ok(())
    }

    /// All commitments in key order. Each call takes a fresh scan.
    pub fn commitments(&self) -> impl Iterator<Item = ScavengeResult<Commitment>> + '_ {
        self.store.prefix_iter(COMMITMENT_PREFIX).map(|(key, value)| {
            let hash = key_suffix(&key, COMMITMENT_PREFIX);
            decode_commitment(&hash, &value)
        })
    }

    /// Write a prepared record. Cannot fail.
    pub fn apply(&mut self, write: PendingWrite) {
        self.store.set(&write.key, write.value);
    }
}

fn decode_puzzle(solution_hash: &str, bytes: &[u8]) -> ScavengeResult<Puzzle> {
    let corrupt = |source| ScavengeError::Decode {
        kind: RecordKind::Puzzle,
        key: solution_hash.to_string(),
        source,
    };
    let puzzle: Puzzle = decode_record(bytes).map_err(corrupt)?;
    puzzle.check().map_err(corrupt)?;
    check_key("solution hash", solution_hash, &puzzle.solution_hash).map_err(corrupt)?;
    Ok(puzzle)
}

fn decode_commitment(binding_hash: &str, bytes: &[u8]) -> ScavengeResult<Commitment> {
    let corrupt = |source| ScavengeError::Decode {
        kind: RecordKind::Commitment,
        key: binding_hash.to_string(),
        source,
    };
    let commitment: Commitment = decode_record(bytes).map_err(corrupt)?;
    check_key("binding hash", binding_hash, &commitment.binding_hash).map_err(corrupt)?;
    Ok(commitment)
}

// A record must live under the hash it carries.
fn check_key(field: &str, key: &str, stored: &str) -> Result<(), CodecError> {
    if key != stored {
        return Err(CodecError::Invariant(format!(
            "{} {} stored under key {}",
            field, stored, key
        )));
    }
    Ok(())
}

fn key_suffix(key: &[u8], prefix: &[u8]) -> String {
    String::from_utf8_lossy(&key[prefix.len().min(key.len())..]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{solution_hash, AccountId, Coins};
    use crate::store::{CodecError, MemoryStore};

    fn puzzle(answer: &str) -> Puzzle {
        Puzzle::new(
            AccountId::from_label("creator"),
            format!("find {}", answer),
            solution_hash(answer),
            Coins::single("token", 100),
        )
    }

    #[test]
    fn test_puzzle_set_get() {
        let mut keeper = Keeper::new(MemoryStore::new());
        let p = puzzle("x");

        keeper.set_puzzle(&p).unwrap();
        assert!(keeper.has_puzzle(&p.solution_hash));
        assert_eq!(keeper.get_puzzle(&p.solution_hash).unwrap(), p);
    }

    #[test]
    fn test_missing_is_not_found() {
        let keeper = Keeper::new(MemoryStore::new());
        let err = keeper.get_puzzle("abc").unwrap_err();
        assert!(err.is_not_found(RecordKind::Puzzle));

        let err = keeper.get_commitment("abc").unwrap_err();
        assert!(err.is_not_found(RecordKind::Commitment));
    }

    #[test]
    fn test_corrupt_is_decode_error() {
        let mut keeper = Keeper::new(MemoryStore::new());
        keeper.store_mut().set(&puzzle_key("bad"), vec![0, 0, 0, 9, 1]);

        let err = keeper.get_puzzle("bad").unwrap_err();
        assert!(matches!(
            err,
            ScavengeError::Decode { kind: RecordKind::Puzzle, source: CodecError::LengthMismatch { .. }, .. }
        ));
        // Still occupies the key
        assert!(keeper.has_puzzle("bad"));
    }

    #[test]
    fn test_half_solved_record_is_decode_error() {
        let mut keeper = Keeper::new(MemoryStore::new());
        let mut p = puzzle("x");
        p.solution = Some("x".to_string());
        keeper.set_puzzle(&p).unwrap();

        assert!(matches!(
            keeper.get_puzzle(&p.solution_hash),
            Err(ScavengeError::Decode { source: CodecError::Invariant(_), .. })
        ));
    }

    #[test]
    fn test_record_under_foreign_key_is_decode_error() {
        let mut keeper = Keeper::new(MemoryStore::new());
        let p = puzzle("x");
        let write = keeper.prepare_puzzle(&p).unwrap();
        let other = solution_hash("y");
        keeper.store_mut().set(&puzzle_key(&other), write.value);

        let err = keeper.get_puzzle(&other).unwrap_err();
        assert!(matches!(
            err,
            ScavengeError::Decode { kind: RecordKind::Puzzle, source: CodecError::Invariant(_), .. }
        ));
        assert!(matches!(keeper.puzzles().next(), Some(Err(ScavengeError::Decode { .. }))));

        let c = Commitment::new(AccountId::from_label("bob"), p.solution_hash.clone(), solution_hash("b"));
        let write = keeper.prepare_commitment(&c).unwrap();
        keeper.store_mut().set(&commitment_key(&other), write.value);
        assert!(matches!(
            keeper.get_commitment(&other),
            Err(ScavengeError::Decode { kind: RecordKind::Commitment, source: CodecError::Invariant(_), .. })
        ));
    }

    #[test]
    fn test_namespaces_are_disjoint() {
        let mut keeper = Keeper::new(MemoryStore::new());
        let p = puzzle("x");
        let c = Commitment::new(AccountId::from_label("bob"), p.solution_hash.clone(), p.solution_hash.clone());

        // Same hex key in both namespaces
        keeper.set_puzzle(&p).unwrap();
        keeper.set_commitment(&c).unwrap();

        assert_eq!(keeper.get_puzzle(&p.solution_hash).unwrap(), p);
        assert_eq!(keeper.get_commitment(&c.binding_hash).unwrap(), c);
        assert_eq!(keeper.puzzles().count(), 1);
        assert_eq!(keeper.commitments().count(), 1);
    }

    #[test]
    fn test_iteration_in_key_order() {
        let mut keeper = Keeper::new(MemoryStore::new());
        for answer in ["c", "a", "b", "d"] {
            keeper.set_puzzle(&puzzle(answer)).unwrap();
        }

        let hashes: Vec<String> = keeper
            .puzzles()
            .map(|p| p.unwrap().solution_hash)
            .collect();
        let mut sorted = hashes.clone();
        sorted.sort();
        assert_eq!(hashes, sorted);
        assert_eq!(hashes.len(), 4);
    }

    #[test]
    fn test_delete_uses_namespaced_key() {
        let mut keeper = Keeper::new(MemoryStore::new());
        let p = puzzle("x");
        keeper.set_puzzle(&p).unwrap();

        assert!(keeper.delete_puzzle(&p.solution_hash));
        assert!(!keeper.has_puzzle(&p.solution_hash));
        assert!(!keeper.delete_puzzle(&p.solution_hash));
    }

    #[test]
    fn test_prepared_write_applies_later() {
        let mut keeper = Keeper::new(MemoryStore::new());
        let p = puzzle("x");

        let write = keeper.prepare_puzzle(&p).unwrap();
        assert!(!keeper.has_puzzle(&p.solution_hash));
        keeper.apply(write);
        assert!(keeper.has_puzzle(&p.solution_hash));
    }
}
