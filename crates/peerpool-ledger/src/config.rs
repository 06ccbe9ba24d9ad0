//! Ledger configuration

use peerpool_common::{AccountId, LedgerError, Result};
use serde::{Deserialize, Serialize};

use crate::events::DEFAULT_EVENT_CAPACITY;

/// Deployment settings for a ledger instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Identity allowed to withdraw liquidity and mark defaults
    pub owner: AccountId,
    /// Account holding pooled funds at the value-transfer service
    pub custody: AccountId,
    /// Broadcast buffer per event subscriber
    pub event_capacity: usize,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            owner: AccountId::from("owner"),
            custody: AccountId::from("peerpool-custody"),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            log_filter: "info".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment and `.env`
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();

        if let Ok(owner) = std::env::var("PEERPOOL_OWNER") {
            cfg.owner = AccountId::from(owner);
        }
        if let Ok(custody) = std::env::var("PEERPOOL_CUSTODY") {
            cfg.custody = AccountId::from(custody);
        }
        if let Ok(val) = std::env::var("PEERPOOL_EVENT_CAPACITY") {
            if let Ok(v) = val.parse() {
                cfg.event_capacity = v;
            }
        }
        if let Ok(filter) = std::env::var("PEERPOOL_LOG_FILTER") {
            cfg.log_filter = filter;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.owner == self.custody {
            return Err(LedgerError::Config(format!(
                "owner and custody must differ (both {})",
                self.owner
            )));
        }
        if self.event_capacity == 0 {
            return Err(LedgerError::Config(
                "event capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        LedgerConfig::default().validate().unwrap();
    }

    #[test]
    fn test_owner_cannot_be_custody() {
        let cfg = LedgerConfig {
            owner: AccountId::from("same"),
            custody: AccountId::from("same"),
            ..LedgerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(LedgerError::Config(_))));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let cfg = LedgerConfig {
            event_capacity: 0,
            ..LedgerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
