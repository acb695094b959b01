//! Request Messages
//!
//! The closed set of operations a caller can submit. Each message carries
//! its own stateless checks; state-dependent checks happen in the engine.

use serde::{Deserialize, Serialize};

use crate::config::ScavengeConfig;
use crate::core::{is_digest_hex, solution_hash, AccountId, Coins};

use super::errors::{ScavengeError, ScavengeResult};

/// Type name of [`MsgCreateScavenge`].
pub const TYPE_CREATE_SCAVENGE: &str = "CreateScavenge";
/// Type name of [`MsgCommitSolution`].
pub const TYPE_COMMIT_SOLUTION: &str = "CommitSolution";
/// Type name of [`MsgRevealSolution`].
pub const TYPE_REVEAL_SOLUTION: &str = "RevealSolution";

/// Post a puzzle and escrow its reward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgCreateScavenge {
    /// Poster and payer.
    pub creator: AccountId,
    /// Clue text.
    pub description: String,
    /// Hex SHA-256 of the answer.
    pub solution_hash: String,
    /// Amount to escrow.
    pub reward: Coins,
}

impl MsgCreateScavenge {
    /// Create the message.
    pub fn new(creator: AccountId, description: impl Into<String>, solution_hash: impl Into<String>, reward: Coins) -> Self {
        Self {
            creator,
            description: description.into(),
            solution_hash: solution_hash.into(),
            reward,
        }
    }

    /// Stateless checks.
    pub fn validate_basic(&self, config: &ScavengeConfig) -> ScavengeResult<()> {
        if self.description.trim().is_empty() {
            return Err(invalid("description is empty"));
        }
        if self.description.len() > config.max_description_len {
            return Err(invalid(format!(
                "description is {} bytes, limit is {}",
                self.description.len(),
                config.max_description_len
            )));
        }
        check_digest("solution hash", &self.solution_hash)?;
        if !self.reward.is_positive() {
            return Err(invalid("reward must be positive"));
        }
        if !self.reward.has_valid_denoms() {
            return Err(invalid(format!("reward has an invalid denom: {}", self.reward)));
        }
        Ok(())
    }
}

/// Register a hash-bound claim on an answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgCommitSolution {
    /// Committing account.
    pub solver: AccountId,
    /// Targeted puzzle's solution hash.
    pub solution_hash: String,
    /// Hex SHA-256 of `solution ‖ solver`.
    pub binding_hash: String,
}

impl MsgCommitSolution {
    /// Create the message.
    pub fn new(solver: AccountId, solution_hash: impl Into<String>, binding_hash: impl Into<String>) -> Self {
        Self {
            solver,
            solution_hash: solution_hash.into(),
            binding_hash: binding_hash.into(),
        }
    }

    /// Build a commitment from the plaintext answer, client side.
    pub fn from_solution(solver: AccountId, solution: &str) -> Self {
        Self::new(
            solver,
            solution_hash(solution),
            crate::core::binding_hash(solution, &solver),
        )
    }

    /// Stateless checks.
    pub fn validate_basic(&self) -> ScavengeResult<()> {
        check_digest("solution hash", &self.solution_hash)?;
        check_digest("binding hash", &self.binding_hash)
    }
}

/// Disclose an answer and claim the reward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgRevealSolution {
    /// Revealing account.
    pub solver: AccountId,
    /// Plaintext answer.
    pub solution: String,
    /// Caller's copy of the solution hash. Checked, never trusted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_hash: Option<String>,
}

impl MsgRevealSolution {
    /// Create the message without a confirming hash.
    pub fn new(solver: AccountId, solution: impl Into<String>) -> Self {
        Self {
            solver,
            solution: solution.into(),
            solution_hash: None,
        }
    }

    /// Attach a confirming solution hash.
    pub fn with_solution_hash(mut self, solution_hash: impl Into<String>) -> Self {
        self.solution_hash = Some(solution_hash.into());
        self
    }

    /// Stateless checks, including the confirming hash when present.
    ///
    /// Only the empty string is refused. Any other answer can be the
    /// preimage of a proposed hash, so it must stay revealable.
    pub fn validate_basic(&self) -> ScavengeResult<()> {
        if self.solution.is_empty() {
            return Err(invalid("solution is empty"));
        }
        if let Some(claimed) = &self.solution_hash {
            let computed = solution_hash(&self.solution);
            if *claimed != computed {
                return Err(invalid(format!(
                    "hash of solution ({}) doesn't equal solution hash ({})",
                    computed, claimed
                )));
            }
        }
        Ok(())
    }
}

/// Every request the module accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ScavengeMsg {
    /// See [`MsgCreateScavenge`].
    CreateScavenge(MsgCreateScavenge),
    /// See [`MsgCommitSolution`].
    CommitSolution(MsgCommitSolution),
    /// See [`MsgRevealSolution`].
    RevealSolution(MsgRevealSolution),
}

impl ScavengeMsg {
    /// Module route.
    pub fn route(&self) -> &'static str {
        crate::MODULE_NAME
    }

    /// Message type name.
    pub fn msg_type(&self) -> &'static str {
        match self {
            Self::CreateScavenge(_) => TYPE_CREATE_SCAVENGE,
            Self::CommitSolution(_) => TYPE_COMMIT_SOLUTION,
            Self::RevealSolution(_) => TYPE_REVEAL_SOLUTION,
        }
    }

    /// Account that must authorize the message.
    pub fn signer(&self) -> AccountId {
        match self {
            Self::CreateScavenge(m) => m.creator,
            Self::CommitSolution(m) => m.solver,
            Self::RevealSolution(m) => m.solver,
        }
    }

    /// Stateless checks.
    pub fn validate_basic(&self, config: &ScavengeConfig) -> ScavengeResult<()> {
        match self {
            Self::CreateScavenge(m) => m.validate_basic(config),
            Self::CommitSolution(m) => m.validate_basic(),
            Self::RevealSolution(m) => m.validate_basic(),
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl From<MsgCreateScavenge> for ScavengeMsg {
    fn from(msg: MsgCreateScavenge) -> Self {
        Self::CreateScavenge(msg)
    }
}

impl From<MsgCommitSolution> for ScavengeMsg {
    fn from(msg: MsgCommitSolution) -> Self {
        Self::CommitSolution(msg)
    }
}

impl From<MsgRevealSolution> for ScavengeMsg {
    fn from(msg: MsgRevealSolution) -> Self {
        Self::RevealSolution(msg)
    }
}

fn invalid(reason: impl Into<String>) -> ScavengeError {
    ScavengeError::InvalidInput(reason.into())
}

fn check_digest(field: &str, value: &str) -> ScavengeResult<()> {
    if value.is_empty() {
        return Err(invalid(format!("{} is empty", field)));
    }
    if !is_digest_hex(value) {
        return Err(invalid(format!("{} is not a lowercase hex sha-256 digest: {:?}", field, value)));
    }
    Ok(())
}
