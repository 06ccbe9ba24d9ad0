//! Ledger engine
//!
//! Owns the pool, loans, profiles, and borrower index. Each public mutating
//! call holds the state write lock from validation through commit, so calls
//! are serialized and nobody observes a half-applied call.
//!
//! Calls stage their changes on copies and only write them back after the
//! value-transfer service reports success. A failed transfer therefore leaves
//! no trace.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use peerpool_common::types::loan::{deadline_after, simple_interest};
use peerpool_common::{
    AccessError, AccountId, Amount, CreditScore, LedgerError, Loan, LoanId, LoanStatus, LoanView,
    PaymentOutcome, Pool, ProfileView, Result, StateError, TimingError, TransferError,
    UserProfile, ValidationError, MAX_LOAN_DURATION_DAYS, MIN_LOAN_DURATION_DAYS,
};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::auth::{Authority, OwnerGate};
use crate::clock::Clock;
use crate::config::LedgerConfig;
use crate::events::{EventJournal, EventRecord, LedgerEvent, DEFAULT_EVENT_CAPACITY};
use crate::snapshot::LedgerSnapshot;
use crate::transfer::ValueTransfer;

/// Result of a successful repayment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repayment {
    pub loan_id: LoanId,
    pub amount_paid: Amount,
    pub outcome: PaymentOutcome,
    pub new_score: CreditScore,
}

#[derive(Debug, Default)]
struct LedgerState {
    pool: Pool,
    loans: BTreeMap<LoanId, Loan>,
    profiles: HashMap<AccountId, UserProfile>,
    loans_by_borrower: HashMap<AccountId, Vec<LoanId>>,
    next_loan_id: LoanId,
}

impl LedgerState {
    fn loan(&self, loan_id: LoanId) -> Result<&Loan> {
        self.loans
            .get(&loan_id)
            .ok_or_else(|| StateError::LoanNotFound(loan_id).into())
    }
}

/// Pooled micro-lending ledger
pub struct LedgerEngine {
    custody: AccountId,
    token: Arc<dyn ValueTransfer>,
    clock: Arc<dyn Clock>,
    authority: Arc<dyn Authority>,
    state: RwLock<LedgerState>,
    journal: EventJournal,
}

impl LedgerEngine {
    /// Create an empty ledger whose funds sit in `custody`
    pub fn new(
        custody: AccountId,
        token: Arc<dyn ValueTransfer>,
        clock: Arc<dyn Clock>,
        authority: Arc<dyn Authority>,
    ) -> Self {
        Self {
            custody,
            token,
            clock,
            authority,
            state: RwLock::new(LedgerState::default()),
            journal: EventJournal::new(DEFAULT_EVENT_CAPACITY),
        }
    }

    /// Create an empty ledger from deployment settings, gated on `config.owner`
    pub fn from_config(
        config: &LedgerConfig,
        token: Arc<dyn ValueTransfer>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let authority = Arc::new(OwnerGate::new(config.owner.clone()));
        Ok(Self::new(config.custody.clone(), token, clock, authority)
            .with_event_capacity(config.event_capacity))
    }

    /// Rebuild a ledger from a snapshot; the journal starts empty
    pub fn from_snapshot(
        snapshot: LedgerSnapshot,
        custody: AccountId,
        token: Arc<dyn ValueTransfer>,
        clock: Arc<dyn Clock>,
        authority: Arc<dyn Authority>,
    ) -> Result<Self> {
        snapshot.validate()?;

        let engine = Self::new(custody, token, clock, authority);
        {
            let mut state = engine.state.write();
            state.pool = snapshot.pool;
            state.loans = snapshot.loans.into_iter().map(|l| (l.id, l)).collect();
            state.profiles = snapshot.profiles.into_iter().collect();
            state.loans_by_borrower = snapshot.loans_by_borrower.into_iter().collect();
            state.next_loan_id = snapshot.next_loan_id;
        }
        info!(
            loans = engine.loan_count(),
            liquidity = engine.total_liquidity(),
            "ledger restored from snapshot"
        );
        Ok(engine)
    }

    /// Replace the event broadcast buffer size (call before subscribing)
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.journal = EventJournal::new(capacity);
        self
    }

    /// Pull `amount` from the caller into the pool
    #[instrument(skip(self))]
    pub fn deposit(&self, caller: &AccountId, amount: Amount) -> Result<()> {
        let now = self.clock.now();
        let mut state = self.state.write();

        if amount == 0 {
            return Err(reject(ValidationError::ZeroAmount.into()));
        }

        let mut pool = state.pool.clone();
        pool.credit(amount).map_err(reject)?;

        if !self.token.transfer_from(caller, &self.custody, amount) {
            return Err(reject(
                TransferError::PullRejected {
                    from: caller.clone(),
                    amount,
                }
                .into(),
            ));
        }

        state.pool = pool;
        info!(liquidity = state.pool.total_liquidity, "liquidity added");
        self.journal.publish(
            now,
            [LedgerEvent::LiquidityAdded {
                provider: caller.clone(),
                amount,
            }],
        );
        Ok(())
    }

    /// Borrow `amount` for `duration_days`; returns the new loan id
    #[instrument(skip(self))]
    pub fn request_loan(
        &self,
        caller: &AccountId,
        amount: Amount,
        duration_days: u32,
    ) -> Result<LoanId> {
        let now = self.clock.now();
        let mut state = self.state.write();

        let mut profile = state.profiles.get(caller).cloned().unwrap_or_default();
        profile.touch(now);
        let score = profile.credit_score;

        if amount == 0 {
            return Err(reject(ValidationError::ZeroAmount.into()));
        }
        let limit = score.max_loan_amount();
        if amount > limit {
            return Err(reject(
                ValidationError::ExceedsCreditLimit {
                    requested: amount,
                    limit,
                }
                .into(),
            ));
        }
        if !state.pool.covers(amount) {
            return Err(reject(
                ValidationError::InsufficientLiquidity {
                    requested: amount,
                    available: state.pool.total_liquidity,
                }
                .into(),
            ));
        }
        if !(MIN_LOAN_DURATION_DAYS..=MAX_LOAN_DURATION_DAYS).contains(&duration_days) {
            return Err(reject(
                ValidationError::DurationOutOfRange {
                    days: duration_days,
                    min: MIN_LOAN_DURATION_DAYS,
                    max: MAX_LOAN_DURATION_DAYS,
                }
                .into(),
            ));
        }

        let rate = score.interest_rate();
        let interest = simple_interest(amount, rate, duration_days)
            .ok_or(LedgerError::Overflow("interest"))
            .map_err(reject)?;
        let amount_due = amount
            .checked_add(interest)
            .ok_or(LedgerError::Overflow("amount due"))
            .map_err(reject)?;
        let deadline = deadline_after(now, duration_days)
            .ok_or(LedgerError::Overflow("deadline"))
            .map_err(reject)?;
        debug!(%score, rate, interest, amount_due, deadline, "loan priced");

        let loan_id = state.next_loan_id;
        let next_loan_id = loan_id
            .checked_add(1)
            .ok_or(LedgerError::Overflow("loan id"))
            .map_err(reject)?;
        let loan = Loan::open(loan_id, caller.clone(), amount, amount_due, deadline);

        profile.loans_count += 1;
        profile.total_borrowed = profile
            .total_borrowed
            .checked_add(amount)
            .ok_or(LedgerError::Overflow("total borrowed"))
            .map_err(reject)?;
        let mut pool = state.pool.clone();
        pool.debit(amount).map_err(reject)?;

        if !self.token.transfer(caller, amount) {
            return Err(reject(
                TransferError::PayoutRejected {
                    to: caller.clone(),
                    amount,
                }
                .into(),
            ));
        }

        state.loans.insert(loan_id, loan);
        state
            .loans_by_borrower
            .entry(caller.clone())
            .or_default()
            .push(loan_id);
        state.profiles.insert(caller.clone(), profile);
        state.pool = pool;
        state.next_loan_id = next_loan_id;

        info!(loan_id, amount_due, deadline, "loan issued");
        self.journal.publish(
            now,
            [LedgerEvent::LoanRequested {
                loan_id,
                borrower: caller.clone(),
                amount,
            }],
        );
        Ok(loan_id)
    }

    /// Repay an open loan in full
    #[instrument(skip(self))]
    pub fn repay_loan(&self, caller: &AccountId, loan_id: LoanId) -> Result<Repayment> {
        let now = self.clock.now();
        let mut state = self.state.write();

        let loan = state.loan(loan_id).map_err(reject)?;
        if loan.borrower != *caller {
            return Err(reject(
                StateError::NotBorrower {
                    loan_id,
                    borrower: loan.borrower.clone(),
                    caller: caller.clone(),
                }
                .into(),
            ));
        }
        if !loan.is_open() {
            return Err(reject(
                StateError::NotOpen {
                    loan_id,
                    status: loan.status,
                }
                .into(),
            ));
        }
        let amount_due = loan.amount_due;
        let outcome = PaymentOutcome::from_on_time(loan.is_on_time(now));

        let mut pool = state.pool.clone();
        pool.credit(amount_due).map_err(reject)?;

        let mut profile = state
            .profiles
            .get(caller)
            .cloned()
            .unwrap_or_else(|| UserProfile::opened_at(now));
        profile.total_repaid = profile
            .total_repaid
            .checked_add(amount_due)
            .ok_or(LedgerError::Overflow("total repaid"))
            .map_err(reject)?;

        if !self.token.transfer_from(caller, &self.custody, amount_due) {
            return Err(reject(
                TransferError::PullRejected {
                    from: caller.clone(),
                    amount: amount_due,
                }
                .into(),
            ));
        }

        profile.record_payment(outcome);
        let previous = profile.credit_score;
        profile.credit_score = previous.after_repayment(outcome, profile.account_age(now));
        let new_score = profile.credit_score;

        if let Some(loan) = state.loans.get_mut(&loan_id) {
            loan.status = LoanStatus::Repaid;
        }
        state.pool = pool;
        state.profiles.insert(caller.clone(), profile);

        info!(
            amount_due,
            on_time = outcome.is_on_time(),
            %previous,
            %new_score,
            "loan repaid"
        );
        self.journal.publish(
            now,
            [
                LedgerEvent::ScoreUpdated {
                    user: caller.clone(),
                    new_score,
                },
                LedgerEvent::LoanRepaid {
                    loan_id,
                    borrower: caller.clone(),
                    on_time: outcome.is_on_time(),
                },
            ],
        );

        Ok(Repayment {
            loan_id,
            amount_paid: amount_due,
            outcome,
            new_score,
        })
    }

    /// Write off an open loan whose grace period has passed (owner only)
    ///
    /// The principal is a realized loss: pool liquidity does not change.
    #[instrument(skip(self))]
    pub fn mark_as_defaulted(&self, caller: &AccountId, loan_id: LoanId) -> Result<()> {
        let now = self.clock.now();
        let mut state = self.state.write();

        self.require_owner(caller)?;

        let loan = state.loan(loan_id).map_err(reject)?;
        if !loan.is_open() {
            return Err(reject(
                StateError::NotOpen {
                    loan_id,
                    status: loan.status,
                }
                .into(),
            ));
        }
        if !loan.is_defaultable(now) {
            return Err(reject(
                TimingError::GracePeriodActive {
                    loan_id,
                    grace_ends_at: loan.grace_ends_at(),
                    now,
                }
                .into(),
            ));
        }
        let borrower = loan.borrower.clone();

        if let Some(loan) = state.loans.get_mut(&loan_id) {
            loan.status = LoanStatus::Defaulted;
        }
        let profile = state.profiles.entry(borrower.clone()).or_default();
        profile.credit_score = profile.credit_score.after_default();
        let new_score = profile.credit_score;

        warn!(%borrower, %new_score, "loan defaulted");
        self.journal.publish(
            now,
            [
                LedgerEvent::ScoreUpdated {
                    user: borrower.clone(),
                    new_score,
                },
                LedgerEvent::LoanDefaulted { loan_id, borrower },
            ],
        );
        Ok(())
    }

    /// Pay pool liquidity out to the owner (owner only)
    #[instrument(skip(self))]
    pub fn withdraw_liquidity(&self, caller: &AccountId, amount: Amount) -> Result<()> {
        let now = self.clock.now();
        let mut state = self.state.write();

        self.require_owner(caller)?;

        let mut pool = state.pool.clone();
        pool.debit(amount).map_err(reject)?;

        if !self.token.transfer(caller, amount) {
            return Err(reject(
                TransferError::PayoutRejected {
                    to: caller.clone(),
                    amount,
                }
                .into(),
            ));
        }

        state.pool = pool;
        info!(liquidity = state.pool.total_liquidity, "liquidity withdrawn");
        self.journal.publish(
            now,
            [LedgerEvent::LiquidityWithdrawn {
                owner: caller.clone(),
                amount,
            }],
        );
        Ok(())
    }

    /// Profile projection; unknown identities get the zero profile
    pub fn get_profile(&self, user: &AccountId) -> ProfileView {
        self.state
            .read()
            .profiles
            .get(user)
            .map(UserProfile::view)
            .unwrap_or_else(|| UserProfile::default().view())
    }

    /// Loan projection at the current clock time
    pub fn get_loan(&self, loan_id: LoanId) -> Result<LoanView> {
        let now = self.clock.now();
        let state = self.state.read();
        Ok(state.loan(loan_id)?.view(now))
    }

    /// Loan ids taken by `user`, oldest first
    pub fn get_user_loans(&self, user: &AccountId) -> Vec<LoanId> {
        self.state
            .read()
            .loans_by_borrower
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    pub fn total_liquidity(&self) -> Amount {
        self.state.read().pool.total_liquidity
    }

    /// Number of loan ids issued so far
    pub fn loan_count(&self) -> u64 {
        self.state.read().next_loan_id
    }

    /// Custody balance as reported by the value-transfer service
    pub fn custody_balance(&self) -> Amount {
        self.token.balance_of(&self.custody)
    }

    /// Committed notifications, oldest first
    pub fn events(&self) -> Vec<EventRecord> {
        self.journal.records()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.journal.subscribe()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let taken_at = self.clock.now();
        let state = self.state.read();
        LedgerSnapshot {
            taken_at,
            pool: state.pool.clone(),
            loans: state.loans.values().cloned().collect(),
            profiles: state
                .profiles
                .iter()
                .map(|(id, p)| (id.clone(), p.clone()))
                .collect(),
            loans_by_borrower: state
                .loans_by_borrower
                .iter()
                .map(|(id, loans)| (id.clone(), loans.clone()))
                .collect(),
            next_loan_id: state.next_loan_id,
        }
    }

    fn require_owner(&self, caller: &AccountId) -> Result<()> {
        if self.authority.is_owner(caller) {
            Ok(())
        } else {
            Err(reject(
                AccessError::NotOwner {
                    caller: caller.clone(),
                }
                .into(),
            ))
        }
    }
}

impl std::fmt::Debug for LedgerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerEngine")
            .field("custody", &self.custody)
            .field("state", &*self.state.read())
            .field("journal", &self.journal)
            .finish()
    }
}

/// Log a rejected call and pass the error through
fn reject(err: LedgerError) -> LedgerError {
    warn!(category = err.category(), error = %err, "call rejected");
    err
}
