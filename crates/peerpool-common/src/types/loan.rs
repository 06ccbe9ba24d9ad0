//! Loan - a single disbursement and its repayment obligation
//!
//! `amount_due` is fixed when the loan is created. Later score changes never
//! reprice an existing loan.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, Timestamp, GRACE_PERIOD_SECS, SECONDS_PER_DAY};

/// Sequential loan identifier, never reused
pub type LoanId = u64;

/// Days in the interest year
pub const DAYS_PER_YEAR: u128 = 365;

/// Loan lifecycle state
///
/// `Repaid` and `Defaulted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Open,
    Repaid,
    Defaulted,
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoanStatus::Open => write!(f, "open"),
            LoanStatus::Repaid => write!(f, "repaid"),
            LoanStatus::Defaulted => write!(f, "defaulted"),
        }
    }
}

/// Simple interest over the loan term, truncated toward zero
///
/// `amount * rate_percent * days / (365 * 100)`. Returns `None` on overflow.
pub fn simple_interest(amount: Amount, rate_percent: u32, duration_days: u32) -> Option<Amount> {
    amount
        .checked_mul(rate_percent as Amount)?
        .checked_mul(duration_days as Amount)
        .map(|scaled| scaled / (DAYS_PER_YEAR * 100))
}

/// Absolute deadline for a loan starting at `now`
pub fn deadline_after(now: Timestamp, duration_days: u32) -> Option<Timestamp> {
    (duration_days as i64)
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|term| now.checked_add(term))
}

/// Loan record owned by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,

    /// Immutable after creation
    pub borrower: AccountId,

    /// Amount disbursed
    pub principal: Amount,

    /// Principal plus interest
    pub amount_due: Amount,

    /// Repayment deadline (Unix seconds)
    pub deadline: Timestamp,

    pub status: LoanStatus,
}

impl Loan {
    /// Create an open loan
    pub fn open(
        id: LoanId,
        borrower: AccountId,
        principal: Amount,
        amount_due: Amount,
        deadline: Timestamp,
    ) -> Self {
        Self {
            id,
            borrower,
            principal,
            amount_due,
            deadline,
            status: LoanStatus::Open,
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == LoanStatus::Open
    }

    /// Repayment at `now` counts as on time (deadline inclusive)
    #[inline]
    pub fn is_on_time(&self, now: Timestamp) -> bool {
        now <= self.deadline
    }

    /// Still open and past its deadline
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        self.is_open() && now > self.deadline
    }

    /// Last instant at which the loan cannot yet be defaulted
    pub fn grace_ends_at(&self) -> Timestamp {
        self.deadline.saturating_add(GRACE_PERIOD_SECS)
    }

    /// Open, and strictly past deadline plus grace
    pub fn is_defaultable(&self, now: Timestamp) -> bool {
        self.is_open() && now > self.grace_ends_at()
    }

    /// Read-only projection at `now`
    pub fn view(&self, now: Timestamp) -> LoanView {
        LoanView {
            id: self.id,
            borrower: self.borrower.clone(),
            principal: self.principal,
            amount_due: self.amount_due,
            deadline: self.deadline,
            status: self.status,
            is_overdue: self.is_overdue(now),
        }
    }
}

impl std::fmt::Display for Loan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let deadline = chrono::DateTime::from_timestamp(self.deadline, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| self.deadline.to_string());
        write!(
            f,
            "Loan#{}(borrower={}, due={}, deadline={}, {})",
            self.id, self.borrower, self.amount_due, deadline, self.status
        )
    }
}

/// Query projection of a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub borrower: AccountId,
    pub principal: Amount,
    pub amount_due: Amount,
    pub deadline: Timestamp,
    pub status: LoanStatus,
    /// Open and past deadline
    pub is_overdue: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Loan {
        Loan::open(0, AccountId::from("alice"), 100, 101, 1_000)
    }

    #[test]
    fn test_interest_truncates() {
        // 100 * 15 * 30 / 36500 = 1.23..
        assert_eq!(simple_interest(100, 15, 30), Some(1));
        // 10_000 * 5 * 365 / 36500 = 500 exactly
        assert_eq!(simple_interest(10_000, 5, 365), Some(500));
        assert_eq!(simple_interest(100, 15, 7), Some(0));
    }

    #[test]
    fn test_interest_overflow() {
        assert_eq!(simple_interest(Amount::MAX, 15, 30), None);
    }

    #[test]
    fn test_deadline_after() {
        assert_eq!(deadline_after(0, 7), Some(7 * SECONDS_PER_DAY));
        assert_eq!(deadline_after(i64::MAX, 7), None);
    }

    #[test]
    fn test_on_time_is_inclusive() {
        let loan = sample();
        assert!(loan.is_on_time(1_000));
        assert!(!loan.is_on_time(1_001));
    }

    #[test]
    fn test_overdue_only_when_open() {
        let mut loan = sample();
        assert!(!loan.is_overdue(1_000));
        assert!(loan.is_overdue(1_001));

        loan.status = LoanStatus::Repaid;
        assert!(!loan.is_overdue(1_001));
        assert!(!loan.view(1_001).is_overdue);
    }

    #[test]
    fn test_defaultable_boundary() {
        let loan = sample();
        assert!(!loan.is_defaultable(1_000 + GRACE_PERIOD_SECS));
        assert!(loan.is_defaultable(1_000 + GRACE_PERIOD_SECS + 1));
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&LoanStatus::Defaulted).unwrap(),
            "\"defaulted\""
        );
    }
}
