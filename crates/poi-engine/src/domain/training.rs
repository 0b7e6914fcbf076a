//! # Training Data Export & AI Auto-Trainer
//!
//! Exports labeled samples from recent chain history plus the attack log,
//! and runs the periodic self-training round that nudges the synthetic
//! accuracy metric and validator intelligence scores.
//!
//! The "training" here is deliberately simplistic arithmetic over sample
//! counts. That arithmetic is the behavior being simulated, not a stand-in
//! for a real model.

use super::state::LedgerState;
use rand::Rng;
use shared_types::{AttackType, TrainingSample};
use tracing::debug;

/// Number of most recent blocks mined for samples.
const TRAINING_BLOCK_WINDOW: usize = 100;

/// Number of most recent attack-log entries mined for samples.
const TRAINING_ATTACK_WINDOW: usize = 50;

/// Fraud score assigned to samples synthesized from the attack log.
const ATTACK_SAMPLE_SCORE: f64 = 0.95;

/// Labeled samples from the most recent blocks and attack-log entries,
/// oldest first, capped at `limit`.
pub fn training_data(state: &LedgerState, limit: usize) -> Vec<TrainingSample> {
    let mut samples = Vec::new();

    let start = state.blocks.len().saturating_sub(TRAINING_BLOCK_WINDOW);
    for block in &state.blocks[start..] {
        for tx in &block.transactions {
            samples.push(TrainingSample {
                features: tx.to_features(),
                is_fraud: tx.is_fraud,
                fraud_score: tx.fraud_score,
                tx_hash: tx.hash.clone(),
                block_index: Some(block.index),
                attack_type: None,
            });
        }
    }

    let skip = state
        .attack_patterns
        .len()
        .saturating_sub(TRAINING_ATTACK_WINDOW);
    for pattern in state.attack_patterns.iter().skip(skip) {
        samples.push(TrainingSample {
            features: attack_features(pattern.attack_type, pattern.amount),
            is_fraud: true,
            fraud_score: ATTACK_SAMPLE_SCORE,
            tx_hash: pattern.tx_hash.clone(),
            block_index: None,
            attack_type: Some(pattern.attack_type),
        });
    }

    samples.truncate(limit);
    samples
}

/// Fixed synthetic feature vector for an attack-log sample, shaped like
/// the transaction feature vector (10 elements).
fn attack_features(attack_type: AttackType, amount: f64) -> Vec<f64> {
    vec![
        amount / 1_000_000.0,
        if attack_type == AttackType::FlashLoan { 1.0 } else { 0.0 },
        if attack_type == AttackType::Reentrancy { 1.0 } else { 0.0 },
        if attack_type == AttackType::Sandwich { 1.0 } else { 0.0 },
        if attack_type == AttackType::Dust { 1.0 } else { 0.0 },
        1.0,
        0.0,
        0.0,
        0.0,
        1.0,
    ]
}

/// One auto-training round over a fresh snapshot.
///
/// Runs only when the snapshot holds enough samples. Accuracy moves up by
/// `0.001 * (1 + 0.1*fraudSamples + 0.2*attackSamples)`, bounded at 0.99,
/// and every active validator's intelligence is re-derived from its
/// blocks-validated count plus a small jitter, capped at 0.99.
pub fn auto_train(state: &mut LedgerState, now: u64) {
    let snapshot = training_data(state, state.config.training_snapshot_size);
    if snapshot.len() < state.config.min_training_samples {
        debug!(
            "[poi-training] skipping round: {} samples < {} required",
            snapshot.len(),
            state.config.min_training_samples
        );
        return;
    }

    let fraud_samples = snapshot.iter().filter(|s| s.is_fraud).count();
    let attack_samples = snapshot.iter().filter(|s| s.attack_type.is_some()).count();

    let improvement =
        0.001 * (1.0 + fraud_samples as f64 * 0.1 + attack_samples as f64 * 0.2);
    state.ai_model.accuracy = (state.ai_model.accuracy + improvement).min(0.99);
    state.ai_model.training_rounds += 1;
    state.ai_model.last_trained = now;

    // Validators that commit more blocks drift towards higher intelligence.
    for validator in state.validators.values_mut() {
        if validator.is_active {
            let blocks_factor = (validator.blocks_validated as f64 / 10_000.0).min(1.0);
            let jitter: f64 = state.rng.gen_range(0.0..0.09);
            validator.intelligence_score = (0.7 + blocks_factor * 0.2 + jitter).min(0.99);
        }
    }

    state.stats.ai_decisions += snapshot.len() as u64;
    state.ai_model.total_predictions += snapshot.len() as u64;
    state.ai_model.fraud_detected_by_ai += fraud_samples as u64;

    debug!(
        "[poi-training] round {} complete: accuracy={:.4}, samples={}, fraud={}",
        state.ai_model.training_rounds,
        state.ai_model.accuracy,
        snapshot.len(),
        fraud_samples
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::domain::producer;

    const NOW: u64 = 1_700_000_000;

    fn state_with_blocks(seed: u64, blocks: usize) -> LedgerState {
        let config = EngineConfig {
            rng_seed: Some(seed),
            ai_score_threshold: -1.0, // accept everything
            ..EngineConfig::default()
        };
        let mut state = LedgerState::new(config, NOW);
        for _ in 0..blocks {
            producer::produce_block(&mut state, NOW);
        }
        state
    }

    #[test]
    fn test_training_data_drawn_from_recent_blocks() {
        let state = state_with_blocks(3, 5);
        let samples = training_data(&state, 10_000);
        assert!(!samples.is_empty());
        for sample in &samples {
            assert_eq!(sample.features.len(), 10);
            assert!(sample.fraud_score >= 0.0 && sample.fraud_score <= 1.0);
        }
        // Chain samples carry their block index.
        assert!(samples.iter().any(|s| s.block_index.is_some()));
    }

    #[test]
    fn test_attack_log_entries_become_high_score_samples() {
        let mut state = state_with_blocks(5, 0);
        crate::domain::synthesizer::synthesize(&mut state, true, NOW);
        let samples = training_data(&state, 100);
        let attack_sample = samples
            .iter()
            .find(|s| s.attack_type.is_some())
            .expect("attack sample exported");
        assert!(attack_sample.is_fraud);
        assert_eq!(attack_sample.fraud_score, ATTACK_SAMPLE_SCORE);
        assert_eq!(attack_sample.features.len(), 10);
    }

    #[test]
    fn test_limit_caps_the_export() {
        let state = state_with_blocks(7, 10);
        assert_eq!(training_data(&state, 25).len(), 25);
    }

    #[test]
    fn test_round_skipped_below_minimum_samples() {
        let mut state = state_with_blocks(9, 0);
        let accuracy_before = state.ai_model.accuracy;
        auto_train(&mut state, NOW);
        assert_eq!(state.ai_model.training_rounds, 0);
        assert_eq!(state.ai_model.accuracy, accuracy_before);
    }

    #[test]
    fn test_round_raises_accuracy_and_retunes_validators() {
        let mut state = state_with_blocks(11, 10);
        let accuracy_before = state.ai_model.accuracy;
        auto_train(&mut state, NOW);

        assert_eq!(state.ai_model.training_rounds, 1);
        assert_eq!(state.ai_model.last_trained, NOW);
        assert!(state.ai_model.accuracy > accuracy_before);
        assert!(state.ai_model.total_predictions > 0);

        for validator in state.validators.values() {
            assert!(validator.intelligence_score >= 0.7);
            assert!(validator.intelligence_score <= 0.99);
        }
    }

    #[test]
    fn test_accuracy_never_exceeds_cap() {
        let mut state = state_with_blocks(13, 10);
        state.ai_model.accuracy = 0.9899;
        for _ in 0..10 {
            auto_train(&mut state, NOW);
        }
        assert!(state.ai_model.accuracy <= 0.99);
    }
}
