//! # Scavenge
//!
//! Commit-reveal scavenger hunts: post a puzzle with an escrowed reward,
//! commit to an answer without showing it, then reveal it to collect.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SCAVENGE                                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── account.rs  - 20-byte account ids, module accounts      │
//! │  ├── coins.rs    - Multi-denom amounts                       │
//! │  └── hash.rs     - Solution and binding hashes               │
//! │                                                              │
//! │  store/          - Keyed store abstraction                   │
//! │  └── codec.rs    - Length-prefixed record encoding           │
//! │                                                              │
//! │  ledger/         - Balance ledger abstraction                │
//! │                                                              │
//! │  scavenge/       - The protocol                              │
//! │  ├── engine.rs   - Propose / Commit / Reveal                 │
//! │  ├── keeper.rs   - Record repository                         │
//! │  └── router.rs   - Message dispatch                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Front-running
//!
//! A commitment keys on `SHA-256(solution ‖ solver)`. Someone who copies a
//! pending commitment gains nothing: at reveal the key is recomputed from
//! the revealer's own account, so only the original committer can collect.
//!
//! ## Execution model
//!
//! Single-threaded and synchronous. The host serializes operations and
//! provides transactional isolation between them; the engine holds no
//! locks.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod ledger;
pub mod scavenge;
pub mod store;

// Re-export commonly used types
pub use config::ScavengeConfig;
pub use crate::core::{binding_hash, solution_hash, AccountId, Coins};
pub use ledger::{Ledger, LedgerError, MemoryLedger};
pub use scavenge::{
    Commitment, MsgRouter, Puzzle, ScavengeEngine, ScavengeError, ScavengeEvent, ScavengeMsg,
};
pub use store::{KeyValueStore, MemoryStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Module name used for routing and event attributes.
pub const MODULE_NAME: &str = "scavenge";
