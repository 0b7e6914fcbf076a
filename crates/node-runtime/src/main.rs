//! # NeoNet PoI Simulation Node
//!
//! Entry point for the Proof-of-Intelligence ledger simulation. Starts the
//! engine's block producer and auto-trainer loops and runs until Ctrl+C.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration overrides from the environment
//! 3. Build the engine (genesis network initialized synchronously)
//! 4. Start the scheduler loops
//! 5. Wait for Ctrl+C, then drain the loops

use anyhow::Result;
use poi_engine::{EngineConfig, PoiEngine};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Load configuration from environment overrides.
fn load_config() -> EngineConfig {
    let mut config = EngineConfig::default();

    if let Ok(interval) = std::env::var("NEONET_BLOCK_INTERVAL_SECS") {
        match interval.parse() {
            Ok(secs) => config.block_interval_secs = secs,
            Err(_) => warn!("NEONET_BLOCK_INTERVAL_SECS must be an integer number of seconds"),
        }
    }
    if let Ok(interval) = std::env::var("NEONET_TRAINING_INTERVAL_SECS") {
        match interval.parse() {
            Ok(secs) => config.training_interval_secs = secs,
            Err(_) => warn!("NEONET_TRAINING_INTERVAL_SECS must be an integer number of seconds"),
        }
    }
    if let Ok(threshold) = std::env::var("NEONET_AI_SCORE_THRESHOLD") {
        match threshold.parse() {
            Ok(t) => config.ai_score_threshold = t,
            Err(_) => warn!("NEONET_AI_SCORE_THRESHOLD must be a float"),
        }
    }
    if let Ok(seed) = std::env::var("NEONET_RNG_SEED") {
        match seed.parse() {
            Ok(s) => config.rng_seed = Some(s),
            Err(_) => warn!("NEONET_RNG_SEED must be an integer"),
        }
    }

    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config();

    info!("===========================================");
    info!("  NeoNet PoI Simulation Node v0.1.0");
    info!("===========================================");

    let engine = PoiEngine::new(config);
    let stats = engine.network_stats();
    info!(
        "Genesis network ready: {} validators, {:.0} staked, supply {:.0}",
        stats.validators, stats.total_stake, stats.total_supply
    );

    engine.start();

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    engine.stop().await;

    let stats = engine.network_stats();
    info!(
        "Final state: height={}, transactions={}, attacks prevented={}",
        stats.block_height, stats.total_transactions, stats.attacks_prevented
    );

    Ok(())
}
