//! Core data types for the PeerPool ledger

pub mod account;
pub mod credit_score;
pub mod loan;
pub mod pool;
pub mod profile;
