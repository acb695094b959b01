//! Record Codec
//!
//! Stored values are length-prefixed bincode:
//!
//! ```text
//! ┌──────────────┬────────────────────────┐
//! │ len: u32 BE  │ bincode body (len B)   │
//! └──────────────┴────────────────────────┘
//! ```
//!
//! The prefix lets a reader tell a truncated or padded value apart from
//! one that merely fails to parse.

use serde::{de::DeserializeOwned, Serialize};

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Value shorter than the length prefix.
    #[error("value truncated: {0} bytes")]
    Truncated(usize),

    /// Prefix disagrees with the body length.
    #[error("length prefix {declared} does not match body length {actual}")]
    LengthMismatch {
        /// Length written in the prefix.
        declared: usize,
        /// Bytes actually present after the prefix.
        actual: usize,
    },

    /// Body does not parse.
    #[error("bincode: {0}")]
    Bincode(String),

    /// Body parses but breaks a record invariant.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Body too large for the prefix.
    #[error("record too large: {0} bytes")]
    TooLarge(usize),
}

/// Encode a record as length-prefixed bincode.
pub fn encode_record<T: Serialize>(record: &T) -> Result<Vec<u8>, CodecError> {
    let body = bincode::serialize(record).map_err(|e| CodecError::Bincode(e.to_string()))?;
    let len = u32::try_from(body.len()).map_err(|_| CodecError::TooLarge(body.len()))?;

    let mut out = Vec::with_capacity(LENGTH_PREFIX_LEN + body.len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode a length-prefixed bincode record.
pub fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    if bytes.len() < LENGTH_PREFIX_LEN {
        return Err(CodecError::Truncated(bytes.len()));
    }

    let (prefix, body) = bytes.split_at(LENGTH_PREFIX_LEN);
    let mut len_bytes = [0u8; LENGTH_PREFIX_LEN];
    len_bytes.copy_from_slice(prefix);
    let declared = u32::from_be_bytes(len_bytes) as usize;

    if declared != body.len() {
        return Err(CodecError::LengthMismatch {
            declared,
            actual: body.len(),
        });
    }

    bincode::deserialize(body).map_err(|e| CodecError::Bincode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        value: u64,
        tag: Option<String>,
    }

    fn sample() -> Sample {
        Sample {
            name: "alpha".to_string(),
            value: 42,
            tag: None,
        }
    }

    #[test]
    fn test_prefix_matches_body() {
        let bytes = encode_record(&sample()).unwrap();
        let declared = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        assert_eq!(declared, bytes.len() - LENGTH_PREFIX_LEN);
        assert_eq!(decode_record::<Sample>(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_truncated() {
        assert_eq!(decode_record::<Sample>(&[0, 0]), Err(CodecError::Truncated(2)));
        assert_eq!(decode_record::<Sample>(&[]), Err(CodecError::Truncated(0)));
    }

    #[test]
    fn test_length_mismatch() {
        let mut bytes = encode_record(&sample()).unwrap();
        bytes.push(0xFF);
        assert!(matches!(
            decode_record::<Sample>(&bytes),
            Err(CodecError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_garbage_body() {
        // Prefix is consistent but the body is not a Sample
        let bytes = [0, 0, 0, 2, 0xFF, 0xFF];
        assert!(matches!(decode_record::<Sample>(&bytes), Err(CodecError::Bincode(_))));
    }
}
