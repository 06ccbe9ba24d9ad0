//! # PeerPool Ledger
//!
//! Pooled micro-lending with repayment-driven credit scores.
//!
//! ## Lifecycle
//!
//! ```text
//! deposit -> request_loan -> repay_loan          (Open -> Repaid)
//!                         -> mark_as_defaulted   (Open -> Defaulted, owner only,
//!                                                 after deadline + 30 days)
//! ```
//!
//! ## Collaborators
//!
//! The engine never moves funds, reads the time, or authenticates anyone
//! itself. It is handed:
//! - a [`ValueTransfer`] service (`transfer`, `transfer_from`, `balance_of`)
//! - a [`Clock`]
//! - an [`Authority`] deciding who the owner is

pub mod auth;
pub mod clock;
pub mod config;
pub mod engine;
pub mod events;
pub mod snapshot;
pub mod transfer;

pub use auth::{Authority, OwnerGate};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LedgerConfig;
pub use engine::{LedgerEngine, Repayment};
pub use events::{EventJournal, EventRecord, LedgerEvent};
pub use snapshot::LedgerSnapshot;
pub use transfer::{InMemoryToken, ValueTransfer};

// Domain types callers need alongside the engine
pub use peerpool_common::{
    interest_rate, max_loan_amount, AccountId, Amount, CreditScore, LedgerError, LoanId,
    LoanStatus, LoanView, PaymentOutcome, ProfileView, Result, Timestamp,
};
