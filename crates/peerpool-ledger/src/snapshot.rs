//! Point-in-time ledger state
//!
//! A snapshot carries everything needed to rebuild an engine: pool, loans,
//! profiles, the borrower index, and the next loan id. The event journal is
//! not part of it.

use std::collections::{BTreeMap, HashSet};

use peerpool_common::{AccountId, LedgerError, Loan, LoanId, Pool, Result, Timestamp, UserProfile};
use serde::{Deserialize, Serialize};

/// Serializable copy of ledger state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Clock time when the snapshot was taken
    pub taken_at: Timestamp,
    pub pool: Pool,
    /// Ordered by id
    pub loans: Vec<Loan>,
    pub profiles: BTreeMap<AccountId, UserProfile>,
    pub loans_by_borrower: BTreeMap<AccountId, Vec<LoanId>>,
    pub next_loan_id: LoanId,
}

impl LedgerSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the cross-references a live engine relies on
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for loan in &self.loans {
            if loan.id >= self.next_loan_id {
                return Err(inconsistent(format!(
                    "loan {} not below next id {}",
                    loan.id, self.next_loan_id
                )));
            }
            if !seen.insert(loan.id) {
                return Err(inconsistent(format!("duplicate loan {}", loan.id)));
            }
            if loan.amount_due < loan.principal {
                return Err(inconsistent(format!("loan {} owes less than principal", loan.id)));
            }
            if !self.profiles.contains_key(&loan.borrower) {
                return Err(inconsistent(format!(
                    "loan {} borrower {} has no profile",
                    loan.id, loan.borrower
                )));
            }
            let indexed = self
                .loans_by_borrower
                .get(&loan.borrower)
                .is_some_and(|ids| ids.contains(&loan.id));
            if !indexed {
                return Err(inconsistent(format!(
                    "loan {} missing from index of {}",
                    loan.id, loan.borrower
                )));
            }
        }

        for (borrower, ids) in &self.loans_by_borrower {
            if !self.profiles.contains_key(borrower) {
                return Err(inconsistent(format!("{} has loans but no profile", borrower)));
            }
            for id in ids {
                let owned = self
                    .loans
                    .iter()
                    .any(|loan| loan.id == *id && loan.borrower == *borrower);
                if !owned {
                    return Err(inconsistent(format!(
                        "index lists loan {} under {}",
                        id, borrower
                    )));
                }
            }
        }

        Ok(())
    }
}

fn inconsistent(reason: String) -> LedgerError {
    LedgerError::Serialization(format!("inconsistent snapshot: {}", reason))
}
