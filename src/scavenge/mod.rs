//! Scavenge Module
//!
//! Commit-reveal scavenger hunts with escrowed rewards.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SCAVENGE MODULE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  msgs.rs     - Request messages and stateless checks        │
//! │  router.rs   - One handler per message, plus dispatch       │
//! │  engine.rs   - Propose / Commit / Reveal state machine      │
//! │  keeper.rs   - Puzzle and commitment namespaces             │
//! │  types.rs    - Record definitions                           │
//! │  events.rs   - Notifications for observers                  │
//! │  genesis.rs  - Snapshot import/export                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod engine;
pub mod errors;
pub mod events;
pub mod genesis;
pub mod keeper;
pub mod msgs;
pub mod router;
pub mod types;

// Re-export key types
pub use engine::ScavengeEngine;
pub use errors::{ScavengeError, ScavengeResult};
pub use events::ScavengeEvent;
pub use genesis::{export_genesis, init_genesis, GenesisState};
pub use keeper::{Keeper, PendingWrite, COMMITMENT_PREFIX, PUZZLE_PREFIX};
pub use msgs::{MsgCommitSolution, MsgCreateScavenge, MsgRevealSolution, ScavengeMsg};
pub use router::{HandlerResult, MsgRouter};
pub use types::{Commitment, Puzzle, RecordKind};
