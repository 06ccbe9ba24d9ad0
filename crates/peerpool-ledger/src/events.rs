//! Ledger notifications
//!
//! Committed calls append their notifications to an ordered journal and fan
//! them out to subscribers. Rejected calls publish nothing.

use parking_lot::Mutex;
use peerpool_common::{AccountId, Amount, CreditScore, LoanId, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Default broadcast buffer per subscriber
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Notification produced by a committed ledger call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LedgerEvent {
    LiquidityAdded {
        provider: AccountId,
        amount: Amount,
    },
    LiquidityWithdrawn {
        owner: AccountId,
        amount: Amount,
    },
    LoanRequested {
        loan_id: LoanId,
        borrower: AccountId,
        amount: Amount,
    },
    LoanRepaid {
        loan_id: LoanId,
        borrower: AccountId,
        on_time: bool,
    },
    LoanDefaulted {
        loan_id: LoanId,
        borrower: AccountId,
    },
    ScoreUpdated {
        user: AccountId,
        new_score: CreditScore,
    },
}

/// Journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the journal, starting at 0
    pub sequence: u64,
    /// Clock time of the call that produced the event
    pub timestamp: Timestamp,
    pub event: LedgerEvent,
}

/// Append-only notification log with live subscribers
pub struct EventJournal {
    records: Mutex<Vec<EventRecord>>,
    sender: broadcast::Sender<EventRecord>,
}

impl EventJournal {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            records: Mutex::new(Vec::new()),
            sender,
        }
    }

    /// Append the events of one committed call, in order
    pub fn publish(&self, timestamp: Timestamp, events: impl IntoIterator<Item = LedgerEvent>) {
        let mut records = self.records.lock();
        for event in events {
            let record = EventRecord {
                sequence: records.len() as u64,
                timestamp,
                event,
            };
            records.push(record.clone());
            // No subscribers is not an error
            if self.sender.send(record).is_err() {
                debug!("no event subscribers");
            }
        }
    }

    /// Receiver for events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.sender.subscribe()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.records.lock().clone()
    }

    fn len(&self) -> usize {
        self.records.lock().len()
    }
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl std::fmt::Debug for EventJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventJournal")
            .field("records", &self.len())
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}
