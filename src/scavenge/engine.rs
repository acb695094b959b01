//! Protocol Engine
//!
//! The three state transitions of a scavenger hunt:
//!
//! ```text
//! Unproposed ──propose──▶ Proposed ──reveal──▶ Solved
//!                            ▲
//!                  commit ───┘ (any time before reveal)
//! ```
//!
//! # Atomicity
//!
//! Every operation validates first, then encodes the record it will write,
//! then moves funds, then writes. Nothing after the ledger call can fail,
//! so an operation either changes both the record and the balances or
//! neither.

use tracing::{debug, info, instrument};

use crate::config::ScavengeConfig;
use crate::core::{binding_hash, solution_hash, AccountId, Coins};
use crate::ledger::Ledger;
use crate::store::KeyValueStore;

use super::errors::{ScavengeError, ScavengeResult};
use super::events::ScavengeEvent;
use super::keeper::Keeper;
use super::msgs::{MsgCommitSolution, MsgCreateScavenge, MsgRevealSolution};
use super::types::{Commitment, Puzzle, RecordKind};

/// Scavenge state machine over an injected store and ledger.
///
/// Pass owned values or `&mut` references; both implement the traits.
///
/// Every accepted operation appends an event to an internal buffer. The
/// router hands each message's events back and removes them. Hosts that
/// call [`propose`](Self::propose), [`commit`](Self::commit) or
/// [`reveal`](Self::reveal) directly must call
/// [`drain_events`](Self::drain_events) themselves, or the buffer keeps
/// growing.
#[derive(Debug)]
pub struct ScavengeEngine<S, L> {
    keeper: Keeper<S>,
    ledger: L,
    config: ScavengeConfig,
    escrow: AccountId,
    events: Vec<ScavengeEvent>,
}

impl<S: KeyValueStore, L: Ledger> ScavengeEngine<S, L> {
    /// Create an engine. The escrow account is derived here, once.
    pub fn new(store: S, ledger: L, config: ScavengeConfig) -> Self {
        let escrow = AccountId::module(&config.module_name);
        debug!(module = %config.module_name, escrow = %escrow, "Scavenge engine ready");
        Self {
            keeper: Keeper::new(store),
            ledger,
            config,
            escrow,
            events: Vec::new(),
        }
    }

    /// Create an engine with default configuration.
    pub fn with_defaults(store: S, ledger: L) -> Self {
        Self::new(store, ledger, ScavengeConfig::default())
    }

    /// Account that holds rewards between propose and reveal.
    pub fn escrow_account(&self) -> AccountId {
        self.escrow
    }

    /// Record repository.
    pub fn keeper(&self) -> &Keeper<S> {
        &self.keeper
    }

    /// Mutable record repository (maintenance and genesis).
    pub fn keeper_mut(&mut self) -> &mut Keeper<S> {
        &mut self.keeper
    }

    /// Balance ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Active configuration.
    pub fn config(&self) -> &ScavengeConfig {
        &self.config
    }

    /// Events emitted since the last drain. Not cleared by reading.
    pub fn events(&self) -> &[ScavengeEvent] {
        &self.events
    }

    /// Take every pending event.
    pub fn drain_events(&mut self) -> Vec<ScavengeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take events emitted after position `mark`.
    pub(crate) fn events_since(&mut self, mark: usize) -> Vec<ScavengeEvent> {
        self.events.split_off(mark.min(self.events.len()))
    }

    /// Release the store and ledger.
    pub fn into_parts(self) -> (S, L) {
        (self.keeper.into_inner(), self.ledger)
    }

    // =========================================================================
    // PROPOSE
    // =========================================================================

    /// Post a puzzle and move its reward into escrow.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - blank description, malformed hash, empty reward
    /// * `DuplicateKey` - a puzzle already uses `solution_hash` (no funds move)
    /// * `Ledger` - the creator cannot cover the reward
    #[instrument(skip_all, fields(creator = %creator.short()))]
    pub fn propose(
        &mut self,
        creator: AccountId,
        description: String,
        solution_hash: String,
        reward: Coins,
    ) -> ScavengeResult<Puzzle> {
        let msg = MsgCreateScavenge::new(creator, description, solution_hash, reward);
        msg.validate_basic(&self.config).map_err(rejected)?;

        if self.keeper.has_puzzle(&msg.solution_hash) {
            return Err(rejected(ScavengeError::DuplicateKey {
                kind: RecordKind::Puzzle,
                key: msg.solution_hash,
            }));
        }

        let puzzle = Puzzle::new(msg.creator, msg.description, msg.solution_hash, msg.reward);
        let write = self.keeper.prepare_puzzle(&puzzle)?;

        self.ledger
            .send_coins(&puzzle.creator, &self.escrow, &puzzle.reward)
            .map_err(|e| rejected(e.into()))?;
        self.keeper.apply(write);

        info!(
            solution_hash = %puzzle.solution_hash,
            reward = %puzzle.reward,
            "Puzzle proposed"
        );
        self.events.push(ScavengeEvent::Proposed {
            creator: puzzle.creator,
            description: puzzle.description.clone(),
            solution_hash: puzzle.solution_hash.clone(),
            reward: puzzle.reward.clone(),
        });

        Ok(puzzle)
    }

    // =========================================================================
    // COMMIT
    // =========================================================================

    /// Register a solver's claim on an answer.
    ///
    /// The binding hash is not checked against anything here, and the
    /// targeted puzzle need not exist yet. Both are settled at reveal.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - malformed hashes
    /// * `DuplicateKey` - a commitment already uses `binding_hash`
    #[instrument(skip_all, fields(solver = %solver.short()))]
    pub fn commit(
        &mut self,
        solver: AccountId,
        solution_hash: String,
        binding_hash: String,
    ) -> ScavengeResult<Commitment> {
        let msg = MsgCommitSolution::new(solver, solution_hash, binding_hash);
        msg.validate_basic().map_err(rejected)?;

        if self.keeper.has_commitment(&msg.binding_hash) {
            return Err(rejected(ScavengeError::DuplicateKey {
                kind: RecordKind::Commitment,
                key: msg.binding_hash,
            }));
        }

        let commitment = Commitment::new(msg.solver, msg.solution_hash, msg.binding_hash);
        let write = self.keeper.prepare_commitment(&commitment)?;
        self.keeper.apply(write);

        info!(
            solution_hash = %commitment.puzzle_hash,
            binding_hash = %commitment.binding_hash,
            "Solution committed"
        );
        self.events.push(ScavengeEvent::Committed {
            solver: commitment.solver,
            solution_hash: commitment.puzzle_hash.clone(),
            binding_hash: commitment.binding_hash.clone(),
        });

        Ok(commitment)
    }

    // =========================================================================
    // REVEAL
    // =========================================================================

    /// Disclose an answer and collect the reward.
    pub fn reveal(&mut self, solver: AccountId, solution: String) -> ScavengeResult<Puzzle> {
        self.reveal_checked(solver, solution, None)
    }

    /// Disclose an answer, checking a caller-supplied solution hash.
    ///
    /// Both hashes are recomputed from the plaintext. A supplied hash is
    /// only compared, never used as a key.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// * `InvalidInput` - empty solution, or supplied hash disagrees
    /// * `NotFound(Commitment)` - no commitment under `H(solution ‖ solver)`
    /// * `NotFound(Puzzle)` - no puzzle under `H(solution)`
    /// * `AlreadySolved` - the puzzle already has a solver
    /// * `Ledger` - escrow cannot cover the payout (puzzle left unsolved)
    #[instrument(skip_all, fields(solver = %solver.short()))]
    pub fn reveal_checked(
        &mut self,
        solver: AccountId,
        solution: String,
        claimed_hash: Option<String>,
    ) -> ScavengeResult<Puzzle> {
        let msg = MsgRevealSolution {
            solver,
            solution,
            solution_hash: claimed_hash,
        };
        msg.validate_basic().map_err(rejected)?;

        // Proves the solver committed to this exact answer beforehand
        let binding = binding_hash(&msg.solution, &msg.solver);
        self.keeper.get_commitment(&binding).map_err(rejected)?;

        let solution_hash = solution_hash(&msg.solution);
        let mut puzzle = self.keeper.get_puzzle(&solution_hash).map_err(rejected)?;

        if !puzzle.mark_solved(msg.solver, msg.solution) {
            return Err(rejected(ScavengeError::AlreadySolved { solution_hash }));
        }

        let write = self.keeper.prepare_puzzle(&puzzle)?;
        self.ledger
            .send_coins(&self.escrow, &msg.solver, &puzzle.reward)
            .map_err(|e| rejected(e.into()))?;
        self.keeper.apply(write);

        info!(
            solution_hash = %puzzle.solution_hash,
            reward = %puzzle.reward,
            "Puzzle solved"
        );
        self.events.push(ScavengeEvent::Solved {
            solver: msg.solver,
            solution_hash: puzzle.solution_hash.clone(),
            description: puzzle.description.clone(),
            solution: puzzle.solution.clone().unwrap_or_default(),
            reward: puzzle.reward.clone(),
        });

        Ok(puzzle)
    }
}

fn rejected(err: ScavengeError) -> ScavengeError {
    debug!(error = %err, "Operation rejected");
    err
}
