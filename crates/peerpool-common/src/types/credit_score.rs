//! CreditScore - borrower trustworthiness metric (0-1000)
//!
//! The score drives two step functions:
//! - Interest rate (lower for higher scores)
//! - Maximum loan amount (higher for higher scores)
//!
//! It moves only on repayment (reward or penalty plus a tenure bonus) and on
//! default (flat penalty).

use serde::{Deserialize, Serialize};

use crate::{Amount, SECONDS_PER_DAY};

/// Maximum possible credit score
pub const MAX_SCORE: u16 = 1000;

/// Minimum possible credit score
pub const MIN_SCORE: u16 = 0;

/// Points added for an on-time repayment
pub const ON_TIME_REWARD: u16 = 50;

/// Points removed for a late repayment
pub const LATE_PENALTY: u16 = 100;

/// Points removed when a loan is marked defaulted
pub const DEFAULT_PENALTY: u16 = 200;

/// Tenure bonus accrues per full period of account age
pub const TENURE_PERIOD_DAYS: i64 = 30;

/// Points per full tenure period
pub const TENURE_BONUS_STEP: u16 = 10;

/// Ceiling on the tenure bonus
pub const MAX_TENURE_BONUS: u16 = 200;

/// Score thresholds with their (rate percent, max loan) tier, highest first
const TIERS: [(u16, u32, Amount); 3] = [(800, 5, 10_000), (600, 7, 5_000), (300, 10, 1_000)];

/// Tier for scores under the lowest threshold
const BASE_TIER: (u32, Amount) = (15, 100);

/// Whether a repayment landed on or before its deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    OnTime,
    Late,
}

impl PaymentOutcome {
    pub fn from_on_time(on_time: bool) -> Self {
        if on_time {
            PaymentOutcome::OnTime
        } else {
            PaymentOutcome::Late
        }
    }

    pub fn is_on_time(self) -> bool {
        matches!(self, PaymentOutcome::OnTime)
    }
}

/// Credit score clamped into [0, 1000]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct CreditScore(u16);

impl CreditScore {
    pub const ZERO: CreditScore = CreditScore(MIN_SCORE);
    pub const MAX: CreditScore = CreditScore(MAX_SCORE);

    /// Build a score, clamping anything above the maximum
    pub fn new(points: u16) -> Self {
        Self(points.min(MAX_SCORE))
    }

    #[inline]
    pub fn value(self) -> u16 {
        self.0
    }

    /// Interest rate percent for this score
    #[inline]
    pub fn interest_rate(self) -> u32 {
        interest_rate(self)
    }

    /// Largest principal a borrower with this score may request
    #[inline]
    pub fn max_loan_amount(self) -> Amount {
        max_loan_amount(self)
    }

    /// Score after a repayment
    ///
    /// Adjusts for the outcome, then adds the tenure bonus, then clamps.
    /// The bonus is re-applied on every repayment.
    pub fn after_repayment(self, outcome: PaymentOutcome, account_age_secs: i64) -> Self {
        let adjusted = match outcome {
            PaymentOutcome::OnTime if self.0 < MAX_SCORE => {
                (self.0 + ON_TIME_REWARD).min(MAX_SCORE)
            }
            PaymentOutcome::OnTime => self.0,
            PaymentOutcome::Late => self.0.saturating_sub(LATE_PENALTY),
        };

        Self::new(adjusted.saturating_add(tenure_bonus(account_age_secs)))
    }

    /// Score after one of the borrower's loans is marked defaulted
    pub fn after_default(self) -> Self {
        Self(self.0.saturating_sub(DEFAULT_PENALTY))
    }
}

impl TryFrom<u16> for CreditScore {
    type Error = String;

    fn try_from(points: u16) -> Result<Self, Self::Error> {
        if points > MAX_SCORE {
            return Err(format!("credit score {} above {}", points, MAX_SCORE));
        }
        Ok(Self(points))
    }
}

impl From<CreditScore> for u16 {
    fn from(score: CreditScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for CreditScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, MAX_SCORE)
    }
}

/// Interest rate percent for a score
pub fn interest_rate(score: CreditScore) -> u32 {
    TIERS
        .iter()
        .find(|(threshold, _, _)| score.0 >= *threshold)
        .map(|(_, rate, _)| *rate)
        .unwrap_or(BASE_TIER.0)
}

/// Maximum principal for a score
pub fn max_loan_amount(score: CreditScore) -> Amount {
    TIERS
        .iter()
        .find(|(threshold, _, _)| score.0 >= *threshold)
        .map(|(_, _, limit)| *limit)
        .unwrap_or(BASE_TIER.1)
}

/// Bonus for account age: 10 points per full 30 days, capped at 200
///
/// A negative age (clock moved backwards) earns nothing.
pub fn tenure_bonus(account_age_secs: i64) -> u16 {
    let periods = account_age_secs.max(0) / (TENURE_PERIOD_DAYS * SECONDS_PER_DAY);
    let bonus = periods.saturating_mul(TENURE_BONUS_STEP as i64);
    bonus.min(MAX_TENURE_BONUS as i64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DAY: i64 = SECONDS_PER_DAY;

    #[test]
    fn test_rate_breakpoints() {
        assert_eq!(interest_rate(CreditScore::new(0)), 15);
        assert_eq!(interest_rate(CreditScore::new(299)), 15);
        assert_eq!(interest_rate(CreditScore::new(300)), 10);
        assert_eq!(interest_rate(CreditScore::new(599)), 10);
        assert_eq!(interest_rate(CreditScore::new(600)), 7);
        assert_eq!(interest_rate(CreditScore::new(799)), 7);
        assert_eq!(interest_rate(CreditScore::new(800)), 5);
        assert_eq!(interest_rate(CreditScore::MAX), 5);
    }

    #[test]
    fn test_limit_breakpoints() {
        assert_eq!(max_loan_amount(CreditScore::new(0)), 100);
        assert_eq!(max_loan_amount(CreditScore::new(299)), 100);
        assert_eq!(max_loan_amount(CreditScore::new(300)), 1_000);
        assert_eq!(max_loan_amount(CreditScore::new(600)), 5_000);
        assert_eq!(max_loan_amount(CreditScore::new(800)), 10_000);
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(CreditScore::new(5000).value(), MAX_SCORE);
    }

    #[test]
    fn test_on_time_without_tenure() {
        let score = CreditScore::ZERO.after_repayment(PaymentOutcome::OnTime, 10 * DAY);
        assert_eq!(score.value(), 50);
    }

    #[test]
    fn test_on_time_clamps_at_max() {
        let score = CreditScore::new(980).after_repayment(PaymentOutcome::OnTime, 0);
        assert_eq!(score.value(), 1000);
    }

    #[test]
    fn test_late_floors_at_zero() {
        let score = CreditScore::new(40).after_repayment(PaymentOutcome::Late, 0);
        assert_eq!(score, CreditScore::ZERO);
    }

    #[test]
    fn test_tenure_bonus_added_after_penalty() {
        // 40 - 100 floors at 0, then 2 full periods add 20
        let score = CreditScore::new(40).after_repayment(PaymentOutcome::Late, 65 * DAY);
        assert_eq!(score.value(), 20);
    }

    #[test]
    fn test_tenure_bonus_steps_and_cap() {
        assert_eq!(tenure_bonus(29 * DAY), 0);
        assert_eq!(tenure_bonus(30 * DAY), 10);
        assert_eq!(tenure_bonus(90 * DAY + 5), 30);
        assert_eq!(tenure_bonus(20 * 30 * DAY), 200);
        assert_eq!(tenure_bonus(100 * 30 * DAY), 200);
        assert_eq!(tenure_bonus(-DAY), 0);
    }

    #[test]
    fn test_default_penalty() {
        assert_eq!(CreditScore::new(350).after_default().value(), 150);
        assert_eq!(CreditScore::new(150).after_default(), CreditScore::ZERO);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<CreditScore>("1001").is_err());
        let score: CreditScore = serde_json::from_str("750").unwrap();
        assert_eq!(score.value(), 750);
    }

    proptest! {
        #[test]
        fn prop_rate_non_increasing(a in 0u16..=1000, b in 0u16..=1000) {
            let (lo, hi) = (a.min(b), a.max(b));
            prop_assert!(interest_rate(CreditScore::new(hi)) <= interest_rate(CreditScore::new(lo)));
        }

        #[test]
        fn prop_limit_non_decreasing(a in 0u16..=1000, b in 0u16..=1000) {
            let (lo, hi) = (a.min(b), a.max(b));
            prop_assert!(max_loan_amount(CreditScore::new(hi)) >= max_loan_amount(CreditScore::new(lo)));
        }

        #[test]
        fn prop_updates_stay_in_range(
            start in 0u16..=1000,
            steps in proptest::collection::vec((0u8..3, 0i64..(5 * 365 * DAY)), 0..40),
        ) {
            let mut score = CreditScore::new(start);
            for (kind, age) in steps {
                score = match kind {
                    0 => score.after_repayment(PaymentOutcome::OnTime, age),
                    1 => score.after_repayment(PaymentOutcome::Late, age),
                    _ => score.after_default(),
                };
                prop_assert!(score.value() <= MAX_SCORE);
            }
        }
    }
}
