//! Scavenge Events
//!
//! One event per successful operation, for external observers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{AccountId, Coins};

/// Action name of [`ScavengeEvent::Proposed`].
pub const ACTION_CREATE_SCAVENGE: &str = "CreateScavenge";
/// Action name of [`ScavengeEvent::Committed`].
pub const ACTION_COMMIT_SOLUTION: &str = "CommitSolution";
/// Action name of [`ScavengeEvent::Solved`].
pub const ACTION_SOLVE_SCAVENGE: &str = "SolveScavenge";

/// Attribute keys.
pub mod attr {
    /// Emitting module.
    pub const MODULE: &str = "module";
    /// Action name.
    pub const ACTION: &str = "action";
    /// Account that sent the message.
    pub const ACTOR: &str = "actor";
    /// Puzzle description.
    pub const DESCRIPTION: &str = "description";
    /// Puzzle key.
    pub const SOLUTION_HASH: &str = "solutionHash";
    /// Commitment key.
    pub const BINDING_HASH: &str = "bindingHash";
    /// Revealed answer.
    pub const SOLUTION: &str = "solution";
    /// Winning account.
    pub const SOLVER: &str = "solver";
    /// Reward amount.
    pub const REWARD: &str = "reward";
}

/// What happened during one operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScavengeEvent {
    /// A puzzle was posted and its reward escrowed.
    Proposed {
        /// Poster.
        creator: AccountId,
        /// Clue text.
        description: String,
        /// Puzzle key.
        solution_hash: String,
        /// Escrowed amount.
        reward: Coins,
    },

    /// A commitment was registered.
    Committed {
        /// Committing account.
        solver: AccountId,
        /// Targeted puzzle.
        solution_hash: String,
        /// Commitment key.
        binding_hash: String,
    },

    /// A puzzle was solved and its reward paid.
    Solved {
        /// Winning account.
        solver: AccountId,
        /// Puzzle key.
        solution_hash: String,
        /// Clue text.
        description: String,
        /// Revealed answer.
        solution: String,
        /// Paid amount.
        reward: Coins,
    },
}

impl ScavengeEvent {
    /// Action name.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Proposed { .. } => ACTION_CREATE_SCAVENGE,
            Self::Committed { .. } => ACTION_COMMIT_SOLUTION,
            Self::Solved { .. } => ACTION_SOLVE_SCAVENGE,
        }
    }

    /// Account that triggered the event.
    pub fn actor(&self) -> AccountId {
        match self {
            Self::Proposed { creator, .. } => *creator,
            Self::Committed { solver, .. } | Self::Solved { solver, .. } => *solver,
        }
    }

    /// Flat attribute map.
    pub fn attributes(&self) -> BTreeMap<&'static str, String> {
        let mut attrs = BTreeMap::new();
        attrs.insert(attr::MODULE, crate::MODULE_NAME.to_string());
        attrs.insert(attr::ACTION, self.action().to_string());
        attrs.insert(attr::ACTOR, self.actor().to_string());

        match self {
            Self::Proposed {
                description,
                solution_hash,
                reward,
                ..
            } => {
                attrs.insert(attr::DESCRIPTION, description.clone());
                attrs.insert(attr::SOLUTION_HASH, solution_hash.clone());
                attrs.insert(attr::REWARD, reward.to_string());
            }
            Self::Committed {
                solution_hash,
                binding_hash,
                ..
            } => {
                attrs.insert(attr::SOLUTION_HASH, solution_hash.clone());
                attrs.insert(attr::BINDING_HASH, binding_hash.clone());
            }
            Self::Solved {
                solver,
                solution_hash,
                description,
                solution,
                reward,
            } => {
                attrs.insert(attr::SOLUTION_HASH, solution_hash.clone());
                attrs.insert(attr::DESCRIPTION, description.clone());
                attrs.insert(attr::SOLUTION, solution.clone());
                attrs.insert(attr::SOLVER, solver.to_string());
                attrs.insert(attr::REWARD, reward.to_string());
            }
        }

        attrs
    }
}
