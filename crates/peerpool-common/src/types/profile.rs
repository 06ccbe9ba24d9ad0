//! UserProfile - per-identity borrowing history
//!
//! Profiles are created lazily the first time an identity borrows. The
//! `account_opened_at` stamp is written once and feeds the tenure bonus.

use serde::{Deserialize, Serialize};

use crate::types::credit_score::{CreditScore, PaymentOutcome};
use crate::{Amount, Timestamp};

/// Borrower history and current score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub credit_score: CreditScore,

    /// Cumulative principal borrowed
    pub total_borrowed: Amount,

    /// Cumulative amount repaid (principal plus interest)
    pub total_repaid: Amount,

    pub loans_count: u64,
    pub on_time_payments: u64,
    pub late_payments: u64,

    /// First interaction (Unix seconds); `None` until first touch
    pub account_opened_at: Option<Timestamp>,
}

impl UserProfile {
    /// Profile for an identity first seen at `now`
    pub fn opened_at(now: Timestamp) -> Self {
        Self {
            account_opened_at: Some(now),
            ..Self::default()
        }
    }

    /// Stamp the opening time if it was never set
    pub fn touch(&mut self, now: Timestamp) {
        self.account_opened_at.get_or_insert(now);
    }

    /// Seconds since the account was opened (0 if never opened)
    pub fn account_age(&self, now: Timestamp) -> i64 {
        self.account_opened_at
            .map(|opened| now.saturating_sub(opened))
            .unwrap_or(0)
    }

    /// Count a repayment against the outcome counters
    pub fn record_payment(&mut self, outcome: PaymentOutcome) {
        match outcome {
            PaymentOutcome::OnTime => self.on_time_payments += 1,
            PaymentOutcome::Late => self.late_payments += 1,
        }
    }

    /// Read-only projection with limits derived from the current score
    pub fn view(&self) -> ProfileView {
        ProfileView {
            credit_score: self.credit_score,
            total_borrowed: self.total_borrowed,
            total_repaid: self.total_repaid,
            loans_count: self.loans_count,
            on_time_payments: self.on_time_payments,
            late_payments: self.late_payments,
            account_opened_at: self.account_opened_at,
            max_loan_amount: self.credit_score.max_loan_amount(),
            interest_rate: self.credit_score.interest_rate(),
        }
    }
}

/// Query projection of a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    pub credit_score: CreditScore,
    pub total_borrowed: Amount,
    pub total_repaid: Amount,
    pub loans_count: u64,
    pub on_time_payments: u64,
    pub late_payments: u64,
    pub account_opened_at: Option<Timestamp>,
    /// Derived from the current score
    pub max_loan_amount: Amount,
    /// Percent, derived from the current score
    pub interest_rate: u32,
}

impl std::fmt::Display for ProfileView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Profile(score={}, limit={}, rate={}%, on_time={}, late={})",
            self.credit_score,
            self.max_loan_amount,
            self.interest_rate,
            self.on_time_payments,
            self.late_payments
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_sets_once() {
        let mut profile = UserProfile::default();
        profile.touch(100);
        profile.touch(500);
        assert_eq!(profile.account_opened_at, Some(100));
        assert_eq!(profile.account_age(400), 300);
    }

    #[test]
    fn test_unopened_age_is_zero() {
        assert_eq!(UserProfile::default().account_age(1_000_000), 0);
    }

    #[test]
    fn test_view_derives_limits() {
        let profile = UserProfile {
            credit_score: CreditScore::new(650),
            ..UserProfile::opened_at(0)
        };
        let view = profile.view();
        assert_eq!(view.max_loan_amount, 5_000);
        assert_eq!(view.interest_rate, 7);
    }

    #[test]
    fn test_record_payment() {
        let mut profile = UserProfile::opened_at(0);
        profile.record_payment(PaymentOutcome::OnTime);
        profile.record_payment(PaymentOutcome::Late);
        profile.record_payment(PaymentOutcome::Late);
        assert_eq!(profile.on_time_payments, 1);
        assert_eq!(profile.late_payments, 2);
    }
}
