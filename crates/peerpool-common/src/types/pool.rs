//! Pool - liquidity available for new loans
//!
//! Liquidity grows with deposits and repayments and shrinks with disbursements
//! and owner withdrawals. It can never go negative: a debit larger than the
//! balance is rejected and leaves the pool untouched.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result, ValidationError};
use crate::Amount;

/// Single-asset lending pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Amount currently available to lend
    pub total_liquidity: Amount,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_liquidity(total_liquidity: Amount) -> Self {
        Self { total_liquidity }
    }

    /// Whether `amount` can be lent or withdrawn right now
    #[inline]
    pub fn covers(&self, amount: Amount) -> bool {
        amount <= self.total_liquidity
    }

    /// Add funds (deposit or repayment)
    pub fn credit(&mut self, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }

        self.total_liquidity = self
            .total_liquidity
            .checked_add(amount)
            .ok_or(LedgerError::Overflow("pool credit"))?;
        Ok(())
    }

    /// Remove funds (disbursement or withdrawal)
    pub fn debit(&mut self, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }

        if !self.covers(amount) {
            return Err(ValidationError::InsufficientLiquidity {
                requested: amount,
                available: self.total_liquidity,
            }
            .into());
        }

        self.total_liquidity -= amount;
        Ok(())
    }
}

impl std::fmt::Display for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pool(liquidity={})", self.total_liquidity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_debit() {
        let mut pool = Pool::new();
        pool.credit(100).unwrap();
        pool.debit(30).unwrap();
        assert_eq!(pool.total_liquidity, 70);
    }

    #[test]
    fn test_debit_exact_balance() {
        let mut pool = Pool::with_liquidity(50);
        pool.debit(50).unwrap();
        assert_eq!(pool.total_liquidity, 0);
    }

    #[test]
    fn test_insufficient_liquidity_leaves_pool() {
        let mut pool = Pool::with_liquidity(50);
        let result = pool.debit(51);
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::InsufficientLiquidity { .. }))
        ));
        assert_eq!(pool.total_liquidity, 50);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut pool = Pool::new();
        assert!(pool.credit(0).is_err());
        assert_eq!(pool.debit(0), Err(ValidationError::ZeroAmount.into()));
    }

    #[test]
    fn test_credit_overflow() {
        let mut pool = Pool::with_liquidity(Amount::MAX);
        assert_eq!(pool.credit(1), Err(LedgerError::Overflow("pool credit")));
    }
}
