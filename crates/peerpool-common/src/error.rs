//! Error types for the PeerPool ledger
//!
//! Every rejected call maps to exactly one category: authorization, validation,
//! state conflict, timing, or a failed delegated transfer.

use thiserror::Error;

use crate::types::loan::{LoanId, LoanStatus};
use crate::{AccountId, Amount, Timestamp};

/// Result type alias using LedgerError
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Unified error type for ledger operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // Authorization errors
    #[error("Authorization error: {0}")]
    Access(#[from] AccessError),

    // Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // Loan state conflicts
    #[error("State conflict: {0}")]
    State(#[from] StateError),

    // Deadline / grace period errors
    #[error("Timing error: {0}")]
    Timing(#[from] TimingError),

    // Value-transfer delegate failures
    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    // Checked arithmetic overflow
    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    /// Stable category name for logs and metrics labels
    pub fn category(&self) -> &'static str {
        match self {
            LedgerError::Access(_) => "authorization",
            LedgerError::Validation(_) => "validation",
            LedgerError::State(_) => "state_conflict",
            LedgerError::Timing(_) => "timing",
            LedgerError::Transfer(_) => "delegate_failure",
            LedgerError::Overflow(_) => "overflow",
            LedgerError::Config(_) => "config",
            LedgerError::Serialization(_) => "serialization",
        }
    }
}

/// Caller is not allowed to perform a privileged operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("{caller} is not the ledger owner")]
    NotOwner { caller: AccountId },
}

/// Rejected call arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Amount must be positive")]
    ZeroAmount,

    #[error("Duration {days} days outside [{min}, {max}]")]
    DurationOutOfRange { days: u32, min: u32, max: u32 },

    #[error("Amount {requested} exceeds credit limit {limit}")]
    ExceedsCreditLimit { requested: Amount, limit: Amount },

    #[error("Amount {requested} exceeds pool liquidity {available}")]
    InsufficientLiquidity { requested: Amount, available: Amount },
}

/// Operation conflicts with the current loan state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Loan {0} not found")]
    LoanNotFound(LoanId),

    #[error("Loan {loan_id} belongs to {borrower}, not {caller}")]
    NotBorrower {
        loan_id: LoanId,
        borrower: AccountId,
        caller: AccountId,
    },

    #[error("Loan {loan_id} is {status}, expected open")]
    NotOpen { loan_id: LoanId, status: LoanStatus },
}

/// Operation attempted before it is allowed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimingError {
    #[error("Loan {loan_id} grace period runs until {grace_ends_at}, now {now}")]
    GracePeriodActive {
        loan_id: LoanId,
        grace_ends_at: Timestamp,
        now: Timestamp,
    },
}

/// The value-transfer service reported failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("pull of {amount} from {from} rejected")]
    PullRejected { from: AccountId, amount: Amount },

    #[error("payout of {amount} to {to} rejected")]
    PayoutRejected { to: AccountId, amount: Amount },
}

// Implement From for common external error types
impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for LedgerError {
    fn from(err: anyhow::Error) -> Self {
        LedgerError::Config(err.to_string())
    }
}
