//! Value-transfer capability consumed by the ledger
//!
//! The ledger only looks at the boolean result. `false` fails the whole call.
//! [`InMemoryToken`] is a reference implementation with balances and
//! allowances, used by the demo binary and the test suites.

use std::collections::HashMap;

use parking_lot::Mutex;
use peerpool_common::{AccountId, Amount};
use tracing::debug;

/// Single-asset token operations
///
/// `transfer` moves funds out of the ledger's custody account.
/// `transfer_from` pulls funds that `from` has approved for the custody account.
pub trait ValueTransfer: Send + Sync {
    fn transfer(&self, to: &AccountId, amount: Amount) -> bool;

    fn transfer_from(&self, from: &AccountId, to: &AccountId, amount: Amount) -> bool;

    fn balance_of(&self, account: &AccountId) -> Amount;
}

#[derive(Debug, Default)]
struct TokenBook {
    balances: HashMap<AccountId, Amount>,
    /// Owner -> amount the custody account may pull
    allowances: HashMap<AccountId, Amount>,
    halted: bool,
}

impl TokenBook {
    fn balance(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn move_funds(&mut self, from: &AccountId, to: &AccountId, amount: Amount) -> bool {
        let available = self.balance(from);
        if available < amount {
            return false;
        }
        let Some(credited) = self.balance(to).checked_add(amount) else {
            return false;
        };

        if from != to {
            self.balances.insert(from.clone(), available - amount);
            self.balances.insert(to.clone(), credited);
        }
        true
    }
}

/// Token ledger held in memory
#[derive(Debug)]
pub struct InMemoryToken {
    custody: AccountId,
    book: Mutex<TokenBook>,
}

impl InMemoryToken {
    /// Token whose `transfer` debits `custody`
    pub fn new(custody: AccountId) -> Self {
        Self {
            custody,
            book: Mutex::new(TokenBook::default()),
        }
    }

    /// Create `amount` out of thin air for `account`
    pub fn mint(&self, account: &AccountId, amount: Amount) {
        let mut book = self.book.lock();
        let balance = book.balance(account).saturating_add(amount);
        book.balances.insert(account.clone(), balance);
    }

    /// Let the custody account pull up to `amount` from `owner`
    pub fn approve(&self, owner: &AccountId, amount: Amount) {
        self.book.lock().allowances.insert(owner.clone(), amount);
    }

    pub fn allowance(&self, owner: &AccountId) -> Amount {
        self.book.lock().allowances.get(owner).copied().unwrap_or(0)
    }

    /// Make every subsequent transfer fail (or succeed again)
    pub fn set_halted(&self, halted: bool) {
        self.book.lock().halted = halted;
    }
}

impl ValueTransfer for InMemoryToken {
    fn transfer(&self, to: &AccountId, amount: Amount) -> bool {
        let mut book = self.book.lock();
        if book.halted {
            debug!(%to, amount, "token halted, transfer refused");
            return false;
        }
        book.move_funds(&self.custody, to, amount)
    }

    fn transfer_from(&self, from: &AccountId, to: &AccountId, amount: Amount) -> bool {
        let mut book = self.book.lock();
        if book.halted {
            debug!(%from, amount, "token halted, transfer_from refused");
            return false;
        }

        let allowance = book.allowances.get(from).copied().unwrap_or(0);
        if allowance < amount || !book.move_funds(from, to, amount) {
            return false;
        }
        book.allowances.insert(from.clone(), allowance - amount);
        true
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        self.book.lock().balance(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (InMemoryToken, AccountId, AccountId) {
        let custody = AccountId::from("pool");
        let alice = AccountId::from("alice");
        let token = InMemoryToken::new(custody.clone());
        token.mint(&alice, 500);
        (token, custody, alice)
    }

    #[test]
    fn test_transfer_from_needs_allowance() {
        let (token, custody, alice) = setup();
        assert!(!token.transfer_from(&alice, &custody, 100));

        token.approve(&alice, 150);
        assert!(token.transfer_from(&alice, &custody, 100));
        assert_eq!(token.balance_of(&alice), 400);
        assert_eq!(token.balance_of(&custody), 100);
        assert_eq!(token.allowance(&alice), 50);
    }

    #[test]
    fn test_transfer_from_needs_balance() {
        let (token, custody, alice) = setup();
        token.approve(&alice, 1_000);
        assert!(!token.transfer_from(&alice, &custody, 600));
        assert_eq!(token.allowance(&alice), 1_000);
    }

    #[test]
    fn test_transfer_debits_custody() {
        let (token, custody, alice) = setup();
        token.mint(&custody, 50);
        assert!(token.transfer(&alice, 50));
        assert!(!token.transfer(&alice, 1));
        assert_eq!(token.balance_of(&alice), 550);
    }

    #[test]
    fn test_halted_token_refuses() {
        let (token, custody, alice) = setup();
        token.mint(&custody, 50);
        token.approve(&alice, 100);
        token.set_halted(true);
        assert!(!token.transfer(&alice, 10));
        assert!(!token.transfer_from(&alice, &custody, 10));
        token.set_halted(false);
        assert!(token.transfer(&alice, 10));
    }
}
