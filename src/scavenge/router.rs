//! Message Router
//!
//! One method per operation, plus a dispatcher over [`ScavengeMsg`].

use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;
use crate::store::KeyValueStore;

use super::engine::ScavengeEngine;
use super::errors::ScavengeResult;
use super::events::ScavengeEvent;
use super::msgs::{MsgCommitSolution, MsgCreateScavenge, MsgRevealSolution, ScavengeMsg};

/// Outcome of one handled message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResult {
    /// Events emitted while handling this message only.
    pub events: Vec<ScavengeEvent>,
}

/// Handles scavenge messages.
pub trait MsgRouter {
    /// Post a puzzle.
    fn create_scavenge(&mut self, msg: MsgCreateScavenge) -> ScavengeResult<HandlerResult>;

    /// Register a commitment.
    fn commit_solution(&mut self, msg: MsgCommitSolution) -> ScavengeResult<HandlerResult>;

    /// Reveal an answer.
    fn reveal_solution(&mut self, msg: MsgRevealSolution) -> ScavengeResult<HandlerResult>;

    /// Dispatch any message to its handler.
    fn route(&mut self, msg: ScavengeMsg) -> ScavengeResult<HandlerResult> {
        match msg {
            ScavengeMsg::CreateScavenge(m) => self.create_scavenge(m),
            ScavengeMsg::CommitSolution(m) => self.commit_solution(m),
            ScavengeMsg::RevealSolution(m) => self.reveal_solution(m),
        }
    }
}

impl<S: KeyValueStore, L: Ledger> MsgRouter for ScavengeEngine<S, L> {
    fn create_scavenge(&mut self, msg: MsgCreateScavenge) -> ScavengeResult<HandlerResult> {
        let mark = self.events().len();
        self.propose(msg.creator, msg.description, msg.solution_hash, msg.reward)?;
        Ok(HandlerResult {
            events: self.events_since(mark),
        })
    }

    fn commit_solution(&mut self, msg: MsgCommitSolution) -> ScavengeResult<HandlerResult> {
        let mark = self.events().len();
        self.commit(msg.solver, msg.solution_hash, msg.binding_hash)?;
        Ok(HandlerResult {
            events: self.events_since(mark),
        })
    }

    fn reveal_solution(&mut self, msg: MsgRevealSolution) -> ScavengeResult<HandlerResult> {
        let mark = self.events().len();
        self.reveal_checked(msg.solver, msg.solution, msg.solution_hash)?;
        Ok(HandlerResult {
            events: self.events_since(mark),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{solution_hash, AccountId, Coins};
    use crate::ledger::MemoryLedger;
    use crate::scavenge::errors::ScavengeError;
    use crate::scavenge::events::attr;
    use crate::store::MemoryStore;

    fn engine() -> ScavengeEngine<MemoryStore, MemoryLedger> {
        let ledger = MemoryLedger::new().with_balance(AccountId::from_label("alice"), Coins::single("token", 500));
        ScavengeEngine::with_defaults(MemoryStore::new(), ledger)
    }

    #[test]
    fn test_route_full_cycle() {
        let mut engine = engine();
        let alice = AccountId::from_label("alice");
        let bob = AccountId::from_label("bob");

        let msgs: Vec<ScavengeMsg> = vec![
            MsgCreateScavenge::new(alice, "find X", solution_hash("x"), Coins::single("token", 100)).into(),
            MsgCommitSolution::from_solution(bob, "x").into(),
            MsgRevealSolution::new(bob, "x").with_solution_hash(solution_hash("x")).into(),
        ];

        let mut actions = Vec::new();
        for msg in msgs {
            let result = engine.route(msg).unwrap();
            assert_eq!(result.events.len(), 1);
            actions.push(result.events[0].action());
        }
        assert_eq!(actions, vec!["CreateScavenge", "CommitSolution", "SolveScavenge"]);
    }

    #[test]
    fn test_result_holds_only_this_message() {
        let mut engine = engine();
        let bob = AccountId::from_label("bob");

        // Left undrained by a direct call
        engine
            .commit(bob, solution_hash("y"), crate::core::binding_hash("y", &bob))
            .unwrap();

        let result = engine
            .route(MsgCommitSolution::from_solution(bob, "x").into())
            .unwrap();
        assert_eq!(result.events.len(), 1);
        let attrs = result.events[0].attributes();
        assert_eq!(attrs[attr::SOLUTION_HASH], solution_hash("x"));
        assert_eq!(engine.events().len(), 1);
    }

    #[test]
    fn test_failed_message_emits_nothing() {
        let mut engine = engine();
        let bob = AccountId::from_label("bob");

        let err = engine.route(MsgRevealSolution::new(bob, "x").into()).unwrap_err();
        assert!(matches!(err, ScavengeError::NotFound { .. }));
        assert!(engine.events().is_empty());
    }
}
