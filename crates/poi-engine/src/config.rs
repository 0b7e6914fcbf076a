//! Configuration types for the simulation engine

use serde::Deserialize;
use std::time::Duration;

/// Fixed token supply of the simulated network.
pub const TOTAL_SUPPLY: f64 = 50_000_000.0;

/// Initial balance of the mining reward pool.
pub const MINING_POOL_REWARDS: f64 = 1_000_000.0;

/// Runtime configuration for the simulation engine.
#[derive(Clone, Debug, Deserialize)]
pub struct EngineConfig {
    /// Seconds between block production attempts.
    pub block_interval_secs: u64,

    /// Seconds between auto-training rounds.
    pub training_interval_secs: u64,

    /// Backoff after a failed loop iteration, in seconds.
    pub retry_backoff_secs: u64,

    /// Number of genesis validators.
    pub validator_count: usize,

    /// Number of funded user accounts created at genesis.
    pub user_account_count: usize,

    /// Probability that a produced block is under attack.
    pub attack_probability: f64,

    /// Per-transaction attack probability while under attack.
    pub attack_tx_probability: f64,

    /// Baseline fraud rate for normal traffic.
    pub base_fraud_rate: f64,

    /// AI score a block must exceed to be committed.
    pub ai_score_threshold: f64,

    /// Maximum entries retained in the attack-pattern log.
    pub attack_log_capacity: usize,

    /// Training snapshot size pulled each auto-training round.
    pub training_snapshot_size: usize,

    /// Minimum samples required before a training round runs.
    pub min_training_samples: usize,

    /// Optional RNG seed for deterministic runs (tests).
    pub rng_seed: Option<u64>,
}

impl EngineConfig {
    /// Block production interval as a [`Duration`].
    pub fn block_interval(&self) -> Duration {
        Duration::from_secs(self.block_interval_secs)
    }

    /// Auto-training interval as a [`Duration`].
    pub fn training_interval(&self) -> Duration {
        Duration::from_secs(self.training_interval_secs)
    }

    /// Failed-iteration backoff as a [`Duration`].
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_interval_secs: 3,
            training_interval_secs: 30,
            retry_backoff_secs: 1,
            validator_count: 21,
            user_account_count: 100,
            attack_probability: 0.1,
            attack_tx_probability: 0.3,
            base_fraud_rate: 0.02,
            ai_score_threshold: 0.5,
            attack_log_capacity: 512,
            training_snapshot_size: 200,
            min_training_samples: 50,
            rng_seed: None,
        }
    }
}
