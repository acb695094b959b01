//! Account Identifiers
//!
//! Accounts are opaque 20-byte ids. Their text form (lowercase hex) is
//! what gets folded into binding hashes.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Length of an account id in bytes.
pub const ACCOUNT_ID_LEN: usize = 20;

/// Ledger account identifier.
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountId(pub [u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive the account owned by a module.
    ///
    /// First 20 bytes of `SHA-256(name)`. Nobody holds a key for it; funds
    /// leave it only through the module's own ledger calls.
    pub fn module(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        let mut id = [0u8; ACCOUNT_ID_LEN];
        id.copy_from_slice(&digest[..ACCOUNT_ID_LEN]);
        Self(id)
    }

    /// Derive a deterministic account from a label (tests and demos).
    pub fn from_label(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"scavenge-account:");
        hasher.update(label.as_bytes());
        let digest = hasher.finalize();
        let mut id = [0u8; ACCOUNT_ID_LEN];
        id.copy_from_slice(&digest[..ACCOUNT_ID_LEN]);
        Self(id)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    /// Short form for logs.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self)
    }
}

/// Errors parsing an account id from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountIdError {
    /// Not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Wrong number of bytes.
    #[error("expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| AccountIdError::InvalidHex(e.to_string()))?;
        let id: [u8; ACCOUNT_ID_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AccountIdError::InvalidLength(bytes.len()))?;
        Ok(Self(id))
    }
}

// Serialized as the hex text form in every format.
impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_account_is_deterministic() {
        assert_eq!(AccountId::module("scavenge"), AccountId::module("scavenge"));
        assert_ne!(AccountId::module("scavenge"), AccountId::module("bank"));
    }

    #[test]
    fn test_module_account_is_hash_prefix() {
        let digest = Sha256::digest(b"scavenge");
        assert_eq!(AccountId::module("scavenge").as_bytes()[..], digest[..ACCOUNT_ID_LEN]);
    }

    #[test]
    fn test_display_parse() {
        let id = AccountId::from_label("alice");
        let text = id.to_string();
        assert_eq!(text.len(), ACCOUNT_ID_LEN * 2);
        assert_eq!(text.parse::<AccountId>().unwrap(), id);
    }

    #[test]
    fn test_json_is_hex_text() {
        let id = AccountId::from_label("bob");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        assert_eq!(serde_json::from_str::<AccountId>(&json).unwrap(), id);
        assert!(serde_json::from_str::<AccountId>("\"beef\"").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!("zz".parse::<AccountId>(), Err(AccountIdError::InvalidHex(_))));
        assert_eq!("abcd".parse::<AccountId>(), Err(AccountIdError::InvalidLength(2)));
    }
}
