//! # Mining Reward Engine
//!
//! Registers worker miners and pays them from the fixed reward pool for
//! submitted task results. The pool check and the debit happen inside one
//! critical section (the caller holds the store's write lock), so two
//! concurrent submissions can never both pass the balance check before
//! either debit lands.

use super::state::LedgerState;
use super::synthesizer;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{
    Miner, Transaction, TxType, VerificationLevel, MINING_POOL_ADDRESS, SIGNATURE_ALGORITHM,
};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

/// Base reward per accepted task, scaled up by quality.
const BASE_TASK_REWARD: f64 = 0.5;

/// Payout receipt for an accepted task submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReward {
    /// Reward paid from the pool.
    pub reward: f64,
    /// Miner balance after the payout.
    pub new_balance: f64,
    /// Miner task counter after the payout.
    pub tasks_completed: u64,
    /// Hash of the reward transaction appended to the pending set.
    pub tx_hash: String,
}

/// Register a new worker miner with a zero balance.
///
/// Fails with `MinerAlreadyRegistered` if the address exists.
pub fn register_miner(
    state: &mut LedgerState,
    address: &str,
    cpu_cores: u32,
    gpu_memory_mb: u64,
    endpoint: Option<&str>,
    now: u64,
) -> Result<Miner> {
    if state.miners.contains_key(address) {
        return Err(EngineError::MinerAlreadyRegistered(address.to_string()));
    }

    let endpoint = match endpoint {
        Some(e) if !e.is_empty() => e.to_string(),
        _ => {
            let prefix: String = address.chars().take(8).collect();
            format!("http://miner-{prefix}.neonet.local")
        }
    };

    let miner = Miner {
        address: address.to_string(),
        cpu_cores,
        gpu_memory_mb,
        endpoint,
        registered_at: now,
        is_active: true,
        tasks_completed: 0,
        rewards_earned: 0.0,
        intelligence_contribution: 0.0,
        last_task_at: 0,
    };

    state.balances.entry(address.to_string()).or_insert(0.0);
    state.miners.insert(address.to_string(), miner.clone());
    info!("[poi-mining] miner registered: {}", address);
    Ok(miner)
}

/// Pay a miner for a submitted task result.
///
/// Reward = `0.5 * (1 + accuracy * completion)`. Fails with
/// `MinerNotFound` / `MinerInactive` for bad miners and `PoolExhausted`
/// exactly when the remaining pool is smaller than the reward. On failure
/// nothing is mutated.
pub fn submit_task_result(
    state: &mut LedgerState,
    miner_address: &str,
    task_id: &str,
    accuracy: f64,
    completion: f64,
    now: u64,
) -> Result<TaskReward> {
    let miner = state
        .miners
        .get(miner_address)
        .ok_or_else(|| EngineError::MinerNotFound(miner_address.to_string()))?;
    if !miner.is_active {
        return Err(EngineError::MinerInactive(miner_address.to_string()));
    }

    let quality = accuracy * completion;
    let reward = BASE_TASK_REWARD * (1.0 + quality);

    if state.mining_pool < reward {
        return Err(EngineError::PoolExhausted {
            requested: reward,
            available: state.mining_pool,
        });
    }

    // Checks passed: apply the whole payout.
    state.mining_pool -= reward;
    let tasks_completed = {
        let miner = state
            .miners
            .get_mut(miner_address)
            .expect("existence checked above");
        miner.rewards_earned += reward;
        miner.tasks_completed += 1;
        miner.last_task_at = now;
        miner.intelligence_contribution += quality * 0.1;
        miner.tasks_completed
    };
    state.credit(miner_address, reward);
    state.stats.mining_rewards_distributed += reward;
    state.stats.ai_tasks_completed += 1;

    let tx_hash = hex::encode(Sha256::digest(format!(
        "reward:{miner_address}:{task_id}:{}",
        Uuid::new_v4()
    )));
    let (evm_signature, quantum_signature, dilithium_signature) =
        synthesizer::pseudo_signatures(&tx_hash, MINING_POOL_ADDRESS);
    let nonce = state.next_nonce(MINING_POOL_ADDRESS);

    let mut metadata = BTreeMap::new();
    metadata.insert("task_id".to_string(), task_id.to_string());
    metadata.insert("quality_score".to_string(), format!("{quality:.4}"));

    let mut reward_tx = Transaction {
        hash: tx_hash.clone(),
        sender: MINING_POOL_ADDRESS.to_string(),
        recipient: miner_address.to_string(),
        amount: reward,
        gas_price: 0.0,
        gas_used: 21_000,
        tx_type: TxType::MiningReward,
        timestamp: now,
        nonce,
        evm_signature,
        quantum_signature,
        dilithium_signature,
        signature_algorithm: SIGNATURE_ALGORITHM.to_string(),
        is_verified: false,
        verification_level: VerificationLevel::Hybrid,
        is_fraud: false,
        fraud_score: 0.0,
        metadata,
    };
    reward_tx.verify_hybrid_signature();
    state.pending_transactions.push(reward_tx);

    info!(
        "[poi-mining] task {} accepted from {}: reward={:.4}, pool={:.2}",
        task_id, miner_address, reward, state.mining_pool
    );

    Ok(TaskReward {
        reward,
        new_balance: state.balance(miner_address),
        tasks_completed,
        tx_hash,
    })
}
