//! Owner gate for privileged operations

use peerpool_common::AccountId;

/// Decides whether a caller may run owner-only operations
pub trait Authority: Send + Sync {
    fn is_owner(&self, caller: &AccountId) -> bool;
}

/// Single fixed owner identity
#[derive(Debug, Clone)]
pub struct OwnerGate {
    owner: AccountId,
}

impl OwnerGate {
    pub fn new(owner: AccountId) -> Self {
        Self { owner }
    }
}

impl Authority for OwnerGate {
    fn is_owner(&self, caller: &AccountId) -> bool {
        *caller == self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_gate() {
        let gate = OwnerGate::new(AccountId::from("owner"));
        assert!(gate.is_owner(&AccountId::from("owner")));
        assert!(!gate.is_owner(&AccountId::from("alice")));
    }
}
