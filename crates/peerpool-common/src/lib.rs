//! # PeerPool Common
//!
//! Shared types, errors, and the credit policy for the PeerPool lending ledger.
//!
//! ## Core Types
//!
//! - [`AccountId`]: identity of a depositor, borrower, owner, or the pool custody account
//! - [`CreditScore`]: 0-1000 score that drives a borrower's rate and limit
//! - [`Loan`]/[`LoanStatus`]: a single loan and its tagged lifecycle state
//! - [`UserProfile`]: per-identity borrowing history
//! - [`Pool`]: liquidity available for new loans
//!
//! ## Credit Policy
//!
//! | score >= | rate | max loan |
//! |----------|------|----------|
//! | 800      | 5%   | 10,000   |
//! | 600      | 7%   | 5,000    |
//! | 300      | 10%  | 1,000    |
//! | else     | 15%  | 100      |

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{
    AccessError, LedgerError, Result, StateError, TimingError, TransferError, ValidationError,
};
pub use types::{
    account::AccountId,
    credit_score::{interest_rate, max_loan_amount, CreditScore, PaymentOutcome},
    loan::{Loan, LoanId, LoanStatus, LoanView},
    pool::Pool,
    profile::{ProfileView, UserProfile},
};

/// Token amount in the pool's single asset (smallest unit)
pub type Amount = u128;

/// Wall-clock time in seconds since the Unix epoch
pub type Timestamp = i64;

/// PeerPool version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seconds in one day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Shortest loan term in days
pub const MIN_LOAN_DURATION_DAYS: u32 = 7;

/// Longest loan term in days
pub const MAX_LOAN_DURATION_DAYS: u32 = 365;

/// Days after the deadline before an open loan may be marked defaulted
pub const GRACE_PERIOD_DAYS: i64 = 30;

/// Grace period in seconds
pub const GRACE_PERIOD_SECS: i64 = GRACE_PERIOD_DAYS * SECONDS_PER_DAY;
