// ── Node identity ──
//
// A node's identity is its Ed25519 public key, exposed by the analyzer
// as a hex string. Different endpoints disagree on case, so the key is
// canonicalized to uppercase on ingestion and every map/dedup operation
// works on the canonical form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Canonical (uppercase hex) public key of a mesh device.
///
/// The primary dedup key across every data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PublicKey(String);

impl PublicKey {
    /// Canonicalize a raw key: trimmed, uppercased.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short prefix for log lines and progress output.
    pub fn abbrev(&self) -> &str {
        let end = self.0.len().min(16);
        self.0.get(..end).unwrap_or(&self.0)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PublicKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for PublicKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Canonicalize on deserialization too, so keys round-tripped through
// saved snapshots stay comparable with freshly fetched ones.
impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_case() {
        let a = PublicKey::new("07e8710c40e04634");
        let b = PublicKey::new("07E8710C40E04634");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "07E8710C40E04634");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(PublicKey::new(" AB12 ").as_str(), "AB12");
    }

    #[test]
    fn abbrev_is_bounded() {
        let key = PublicKey::new("077E8710C40E04634037CF75CEEC2A2F");
        assert_eq!(key.abbrev(), "077E8710C40E0463");
        assert_eq!(PublicKey::new("AB").abbrev(), "AB");
    }

    #[test]
    fn deserialization_canonicalizes() {
        let key: PublicKey = serde_json::from_str("\"ab12\"").unwrap();
        assert_eq!(key.as_str(), "AB12");
    }
}
