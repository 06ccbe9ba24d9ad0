//! AccountId - identity of a ledger participant
//!
//! The ledger never authenticates identities itself. Whoever drives the engine
//! resolves the caller and hands over an `AccountId`.

use serde::{Deserialize, Serialize};

/// Opaque participant identity (wallet address, DID, user handle)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_string() {
        let id = AccountId::from("alice");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"alice\"");
        let back: AccountId = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(back, id);
    }
}
