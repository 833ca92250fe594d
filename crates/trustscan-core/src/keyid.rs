//! Key identifier newtype.
//!
//! A root CA's identity in every bundled trust store is its Subject Key
//! Identifier, carried around as lowercase hex. Certificates sharing an SKI
//! are treated as the same logical root; SKI collisions across unrelated CAs
//! are not defended against.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TrustError};

/// Lowercase-hex Subject/Authority Key Identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(String);

impl KeyId {
    /// Encode the raw octet payload of an SKI/AKI extension.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Validate externally supplied identifier text.
    ///
    /// Uppercase hex is normalized to lowercase. Anything that is not an
    /// even-length, non-empty hex string is rejected.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::InvalidKeyId` on malformed input.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty()
            || trimmed.len() % 2 != 0
            || !trimmed.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(TrustError::InvalidKeyId {
                value: value.to_string(),
            });
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// The lowercase hex text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for KeyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case() {
        let id = KeyId::parse("ABB6DBD7069E37AC3086079170C79CC419B178C0").unwrap();
        assert_eq!(id.as_str(), "abb6dbd7069e37ac3086079170c79cc419b178c0");
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!(KeyId::parse("not-a-key-id").is_err());
        assert!(KeyId::parse("").is_err());
        assert!(KeyId::parse("abc").is_err());
    }

    #[test]
    fn from_bytes_round_trips() {
        let id = KeyId::from_bytes(&[0xab, 0xb6, 0xdb]);
        assert_eq!(id.as_str(), "abb6db");
        assert_eq!(KeyId::parse("abb6db").unwrap(), id);
    }
}
