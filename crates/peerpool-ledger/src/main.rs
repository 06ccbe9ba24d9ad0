//! PeerPool demo - runs a short lending scenario against in-memory collaborators

use std::sync::Arc;

use peerpool_common::SECONDS_PER_DAY;
use peerpool_ledger::{AccountId, InMemoryToken, LedgerConfig, LedgerEngine, ManualClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = LedgerConfig::load()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_filter.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(owner = %config.owner, custody = %config.custody, "Starting PeerPool demo...");

    let token = Arc::new(InMemoryToken::new(config.custody.clone()));
    let clock = Arc::new(ManualClock::new(chrono::Utc::now().timestamp()));
    let engine = LedgerEngine::from_config(&config, token.clone(), clock.clone())?;

    let alice = AccountId::from("alice");
    let bob = AccountId::from("bob");
    for (who, amount) in [(&config.owner, 10_000), (&alice, 1_000), (&bob, 1_000)] {
        token.mint(who, amount);
        token.approve(who, amount);
    }

    engine.deposit(&config.owner, 5_000)?;

    // Alice repays on time, Bob disappears
    let alice_loan = engine.request_loan(&alice, 100, 30)?;
    let bob_loan = engine.request_loan(&bob, 100, 14)?;

    clock.advance_days(20);
    let receipt = engine.repay_loan(&alice, alice_loan)?;
    tracing::info!(score = %receipt.new_score, "alice repaid");

    clock.advance(14 * SECONDS_PER_DAY + 30 * SECONDS_PER_DAY);
    engine.mark_as_defaulted(&config.owner, bob_loan)?;

    for user in [&alice, &bob] {
        tracing::info!(%user, profile = %engine.get_profile(user), "final profile");
    }
    tracing::info!(
        liquidity = engine.total_liquidity(),
        custody = engine.custody_balance(),
        "pool after scenario"
    );

    println!("{}", serde_json::to_string_pretty(&engine.events())?);

    Ok(())
}
