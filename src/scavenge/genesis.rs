//! Genesis Import/Export
//!
//! Snapshot every record as JSON, and load a snapshot into an empty or
//! disjoint store. Balances are the ledger's concern: importing puzzles does
//! not fund the escrow account.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{is_digest_hex, solution_hash};
use crate::store::KeyValueStore;

use super::errors::{ScavengeError, ScavengeResult};
use super::keeper::Keeper;
use super::types::{Commitment, Puzzle, RecordKind};

/// Every scavenge record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    /// Puzzles in key order.
    pub puzzles: Vec<Puzzle>,
    /// Commitments in key order.
    pub commitments: Vec<Commitment>,
}

impl GenesisState {
    /// Check keys, duplicates and record invariants.
    pub fn validate(&self) -> ScavengeResult<()> {
        let mut seen = BTreeSet::new();
        for puzzle in &self.puzzles {
            if !is_digest_hex(&puzzle.solution_hash) {
                return Err(invalid(format!("puzzle key {:?} is not a digest", puzzle.solution_hash)));
            }
            if !seen.insert(puzzle.solution_hash.as_str()) {
                return Err(ScavengeError::DuplicateKey {
                    kind: RecordKind::Puzzle,
                    key: puzzle.solution_hash.clone(),
                });
            }
            puzzle
                .check()
                .map_err(|e| invalid(format!("puzzle {}: {}", puzzle.solution_hash, e)))?;
            if let Some(solution) = &puzzle.solution {
                if solution_hash(solution) != puzzle.solution_hash {
                    return Err(invalid(format!(
                        "puzzle {} records a solution that does not hash to its key",
                        puzzle.solution_hash
                    )));
                }
            }
        }

        let mut seen = BTreeSet::new();
        for commitment in &self.commitments {
            if !is_digest_hex(&commitment.binding_hash) || !is_digest_hex(&commitment.puzzle_hash) {
                return Err(invalid(format!(
                    "commitment {:?} has a malformed hash",
                    commitment.binding_hash
                )));
            }
            if !seen.insert(commitment.binding_hash.as_str()) {
                return Err(ScavengeError::DuplicateKey {
                    kind: RecordKind::Commitment,
                    key: commitment.binding_hash.clone(),
                });
            }
        }

        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Load a snapshot.
///
/// All records are validated and encoded before the first write, and no
/// record may collide with one already stored; on error the store is
/// untouched.
pub fn init_genesis<S: KeyValueStore>(keeper: &mut Keeper<S>, genesis: &GenesisState) -> ScavengeResult<()> {
    genesis.validate()?;

    let mut writes = Vec::with_capacity(genesis.puzzles.len() + genesis.commitments.len());
    for puzzle in &genesis.puzzles {
        if keeper.has_puzzle(&puzzle.solution_hash) {
            return Err(ScavengeError::DuplicateKey {
                kind: RecordKind::Puzzle,
                key: puzzle.solution_hash.clone(),
            });
        }
        writes.push(keeper.prepare_puzzle(puzzle)?);
    }
    for commitment in &genesis.commitments {
        if keeper.has_commitment(&commitment.binding_hash) {
            return Err(ScavengeError::DuplicateKey {
                kind: RecordKind::Commitment,
                key: commitment.binding_hash.clone(),
            });
        }
        writes.push(keeper.prepare_commitment(commitment)?);
    }

    for write in writes {
        keeper.apply(write);
    }

    info!(
        puzzles = genesis.puzzles.len(),
        commitments = genesis.commitments.len(),
        "Genesis loaded"
    );
    Ok(())
}

/// Snapshot every record. Fails on the first corrupt value.
pub fn export_genesis<S: KeyValueStore>(keeper: &Keeper<S>) -> ScavengeResult<GenesisState> {
    Ok(GenesisState {
        puzzles: keeper.puzzles().collect::<ScavengeResult<_>>()?,
        commitments: keeper.commitments().collect::<ScavengeResult<_>>()?,
    })
}

fn invalid(reason: String) -> ScavengeError {
    ScavengeError::InvalidInput(reason)
}
