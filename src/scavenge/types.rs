//! Puzzle and Commitment Records
//!
//! Both records are owned by the keeper. Operations read a fresh copy,
//! modify it, and write the whole record back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{AccountId, Coins};
use crate::store::CodecError;

/// Which record namespace a key belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Puzzle, keyed by solution hash.
    Puzzle,
    /// Commitment, keyed by binding hash.
    Commitment,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Puzzle => f.write_str("puzzle"),
            Self::Commitment => f.write_str("commitment"),
        }
    }
}

/// A posted challenge with an escrowed reward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    /// Account that posted the puzzle and funded the reward.
    pub creator: AccountId,
    /// Free-text clue.
    pub description: String,
    /// Hex SHA-256 of the correct answer; the record key.
    pub solution_hash: String,
    /// Reward held in escrow until solved.
    pub reward: Coins,
    /// Set together with `solution` when solved.
    pub solver: Option<AccountId>,
    /// Set together with `solver` when solved.
    pub solution: Option<String>,
}

impl Puzzle {
    /// Create an unsolved puzzle.
    pub fn new(creator: AccountId, description: String, solution_hash: String, reward: Coins) -> Self {
        Self {
            creator,
            description,
            solution_hash,
            reward,
            solver: None,
            solution: None,
        }
    }

    /// Has a solver been recorded?
    pub fn is_solved(&self) -> bool {
        self.solver.is_some()
    }

    /// Attach the winning solver and answer. Refuses a second attempt.
    pub fn mark_solved(&mut self, solver: AccountId, solution: String) -> bool {
        if self.is_solved() {
            return false;
        }
        self.solver = Some(solver);
        self.solution = Some(solution);
        true
    }

    /// Check the record's own invariants after decoding.
    pub fn check(&self) -> Result<(), CodecError> {
        if self.solver.is_some() != self.solution.is_some() {
            return Err(CodecError::Invariant(
                "solver and solution must be set together".to_string(),
            ));
        }
        if !self.reward.is_positive() {
            return Err(CodecError::Invariant("reward must be positive".to_string()));
        }
        Ok(())
    }
}

/// A solver's hash-bound claim on an answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    /// Account that committed.
    pub solver: AccountId,
    /// Solution hash of the targeted puzzle.
    pub puzzle_hash: String,
    /// Hex SHA-256 of `solution ‖ solver`; the record key.
    pub binding_hash: String,
}

impl Commitment {
    /// Create a commitment.
    pub fn new(solver: AccountId, puzzle_hash: String, binding_hash: String) -> Self {
        Self {
            solver,
            puzzle_hash,
            binding_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle() -> Puzzle {
        Puzzle::new(
            AccountId::from_label("creator"),
            "find X".to_string(),
            crate::core::solution_hash("x"),
            Coins::single("token", 100),
        )
    }

    #[test]
    fn test_new_puzzle_is_unsolved() {
        let p = puzzle();
        assert!(!p.is_solved());
        assert!(p.check().is_ok());
    }

    #[test]
    fn test_mark_solved_once() {
        let mut p = puzzle();
        let bob = AccountId::from_label("bob");
        let carol = AccountId::from_label("carol");

        assert!(p.mark_solved(bob, "x".to_string()));
        assert!(!p.mark_solved(carol, "y".to_string()));
        assert_eq!(p.solver, Some(bob));
        assert_eq!(p.solution.as_deref(), Some("x"));
        assert!(p.check().is_ok());
    }

    #[test]
    fn test_check_rejects_half_solved() {
        let mut p = puzzle();
        p.solver = Some(AccountId::from_label("bob"));
        assert!(matches!(p.check(), Err(CodecError::Invariant(_))));
    }
}
