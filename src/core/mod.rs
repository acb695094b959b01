//! Core primitives.
//!
//! Deterministic building blocks shared by the store, ledger and engine.
//! Nothing here touches storage or system time.

pub mod account;
pub mod coins;
pub mod hash;

// Re-export core types
pub use account::{AccountId, AccountIdError, ACCOUNT_ID_LEN};
pub use coins::{Coins, CoinsParseError};
pub use hash::{binding_hash, is_digest_hex, solution_hash, DIGEST_HEX_LEN};
