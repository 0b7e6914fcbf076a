//! # Block Producer
//!
//! Draws a proposer via the stake-and-intelligence weighted lottery,
//! bundles synthesized traffic plus the pending set, scores the bundle
//! with the heuristic AI validator and commits or rejects the block.
//!
//! ## Invariants Enforced
//!
//! - Block indices are contiguous; the height never advances on rejection.
//! - `block.previous_hash` always equals the tip's hash at commit time.
//! - Rejection is a full no-op on ledger state: the drained pending set is
//!   restored and no balance or counter of the candidate is applied.

use super::state::LedgerState;
use super::synthesizer;
use rand::Rng;
use shared_types::{Block, Transaction, GENESIS_PROPOSER};
use tracing::{debug, warn};

/// Amount above which a transaction counts as a suspicious pattern.
pub const LARGE_AMOUNT_THRESHOLD: f64 = 1_000_000.0;

/// Gas price above which a transaction counts as a suspicious pattern.
pub const HIGH_GAS_PRICE_THRESHOLD: f64 = 500.0;

/// Flat proposer reward per committed block.
pub const BASE_BLOCK_REWARD: f64 = 10.0;

/// Additional proposer reward per bundled transaction.
pub const PER_TX_REWARD: f64 = 0.1;

/// Heuristic AI validation score for a transaction bundle.
///
/// `score = 1 - (fraudRatio*0.4 + avgFraudScore*0.3 + patternPenalty*0.3)`
/// clamped to [0, 1]; an empty bundle scores exactly 1.0. The arithmetic is
/// a fixed pure function, deliberately not a pluggable model.
pub fn score_block(transactions: &[Transaction]) -> f64 {
    if transactions.is_empty() {
        return 1.0;
    }

    let total = transactions.len() as f64;
    let fraud_count = transactions.iter().filter(|t| t.is_fraud).count() as f64;
    let fraud_ratio = fraud_count / total;
    let avg_fraud_score: f64 = transactions.iter().map(|t| t.fraud_score).sum::<f64>() / total;

    let mut suspicious = 0u32;
    for tx in transactions {
        if tx.amount > LARGE_AMOUNT_THRESHOLD {
            suspicious += 1;
        }
        if tx.gas_price > HIGH_GAS_PRICE_THRESHOLD {
            suspicious += 1;
        }
        let mentions_attack = tx
            .metadata
            .iter()
            .any(|(k, v)| k.contains("attack") || v.contains("attack"));
        if mentions_attack {
            suspicious += 2;
        }
    }
    let pattern_penalty = (f64::from(suspicious) * 0.1).min(0.5);

    let score = 1.0 - (fraud_ratio * 0.4 + avg_fraud_score * 0.3 + pattern_penalty * 0.3);
    score.clamp(0.0, 1.0)
}

/// Weighted proposer lottery over active validators.
///
/// Weight = stake x intelligence score; the draw is uniform over the total
/// weight and the first validator whose cumulative weight meets it wins.
/// Iteration order is the store's stable validator ordering. With no
/// active validator the genesis identity proposes.
pub fn select_proposer(state: &mut LedgerState) -> String {
    let active: Vec<(String, f64)> = state
        .validators
        .values()
        .filter(|v| v.is_active)
        .map(|v| (v.address.clone(), v.stake * v.intelligence_score))
        .collect();

    if active.is_empty() {
        return GENESIS_PROPOSER.to_string();
    }

    let total_weight: f64 = active.iter().map(|(_, w)| w).sum();
    let draw = state.rng.gen_range(0.0..total_weight);

    let mut cumulative = 0.0;
    for (address, weight) in &active {
        cumulative += weight;
        if cumulative >= draw {
            return address.clone();
        }
    }
    active[0].0.clone()
}

/// Produce one block: synthesize traffic, bundle the pending set, score,
/// then commit or reject.
///
/// Always updates `last_block_time`, whether or not the block commits.
pub fn produce_block(state: &mut LedgerState, now: u64) -> Block {
    let under_attack = state.rng.gen_bool(state.config.attack_probability);
    let tx_count = state.rng.gen_range(10..=50);

    let mut transactions: Vec<Transaction> = Vec::with_capacity(tx_count);
    for _ in 0..tx_count {
        let is_attack_tx = under_attack && state.rng.gen_bool(state.config.attack_tx_probability);
        transactions.push(synthesizer::synthesize(state, is_attack_tx, now));
    }

    // Bundle whatever is waiting (reward and deployment transactions).
    // Kept aside so a rejection can restore it untouched.
    let drained_pending = std::mem::take(&mut state.pending_transactions);
    transactions.extend(drained_pending.iter().cloned());

    let proposer = select_proposer(state);
    let ai_score = score_block(&transactions);
    state.stats.ai_decisions += 1;

    let tip = state.tip();
    let index = tip.index + 1;
    let previous_hash = tip.hash.clone();
    let hash = Block::compute_hash(index, &transactions, &previous_hash, &proposer);

    let block = Block {
        index,
        timestamp: now,
        transactions,
        previous_hash,
        proposer: proposer.clone(),
        hash,
        ai_score,
    };

    if ai_score > state.config.ai_score_threshold {
        let reward = BASE_BLOCK_REWARD + PER_TX_REWARD * block.transactions.len() as f64;
        state.blocks.push(block.clone());
        if let Some(validator) = state.validators.get_mut(&proposer) {
            validator.blocks_validated += 1;
            validator.rewards_earned += reward;
        }
        if state.validators.contains_key(&proposer) {
            state.credit(&proposer, reward);
        }
        debug!(
            "[poi-producer] block {} committed: txs={}, score={:.3}, proposer={}",
            block.index,
            block.transactions.len(),
            ai_score,
            proposer
        );
    } else {
        // Discard in full: height unchanged, pending set restored.
        state.stats.attacks_prevented += 1;
        state.pending_transactions = drained_pending;
        warn!(
            "[poi-producer] block {} rejected by AI validator: score={:.3} <= {:.2}",
            index, ai_score, state.config.ai_score_threshold
        );
    }

    state.last_block_time = now;
    block
}
