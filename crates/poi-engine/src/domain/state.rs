//! # Ledger State Store
//!
//! Single owner of all mutable simulation state. Every other domain module
//! mutates entities exclusively through a `&mut LedgerState`, and the
//! service layer serializes those mutations behind one write lock.
//!
//! ## Invariants Enforced
//!
//! - Block indices are contiguous from 0; the genesis block is created here.
//! - Sender nonces are handed out strictly monotonically by `next_nonce()`.
//! - The attack-pattern log is bounded (`attack_log_capacity`).
//! - The mining pool only decreases through `mining::submit_task_result`.

use crate::config::{EngineConfig, MINING_POOL_REWARDS, TOTAL_SUPPLY};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use shared_types::{
    AiModel, AiStatus, AttackPattern, Block, Contract, Miner, NetworkSnapshot, NetworkStats,
    Proposal, Transaction, Validator, GENESIS_PROPOSER, SIGNATURE_ALGORITHM,
};
use std::collections::{BTreeMap, VecDeque};

/// All mutable entities of the simulation, owned exclusively by the engine.
#[derive(Debug)]
pub struct LedgerState {
    /// Engine configuration (thresholds, probabilities, intervals).
    pub(crate) config: EngineConfig,
    /// The committed chain, genesis first.
    pub(crate) blocks: Vec<Block>,
    /// Transactions awaiting inclusion in the next committed block.
    pub(crate) pending_transactions: Vec<Transaction>,
    /// Validators keyed by address. BTreeMap iteration is deterministic,
    /// which keeps the proposer lottery ordering stable across draws.
    pub(crate) validators: BTreeMap<String, Validator>,
    /// Registered worker miners keyed by address.
    pub(crate) miners: BTreeMap<String, Miner>,
    /// Governance proposals keyed by id.
    pub(crate) proposals: BTreeMap<String, Proposal>,
    /// Deployed contracts keyed by address.
    pub(crate) contracts: BTreeMap<String, Contract>,
    /// Account balances, all non-negative.
    pub(crate) balances: BTreeMap<String, f64>,
    /// Next nonce per sender (replay protection).
    pub(crate) nonces: BTreeMap<String, u64>,
    /// Aggregate counters.
    pub(crate) stats: NetworkStats,
    /// Bounded log of synthesized attacks, consumed by training export.
    pub(crate) attack_patterns: VecDeque<AttackPattern>,
    /// Remaining mining reward pool balance.
    pub(crate) mining_pool: f64,
    /// Unix timestamp of the last block production attempt.
    pub(crate) last_block_time: u64,
    /// Heuristic fraud model state.
    pub(crate) ai_model: AiModel,
    /// Engine RNG. Lives inside the state so the write lock serializes
    /// draws alongside the mutations they feed.
    pub(crate) rng: StdRng,
}

impl LedgerState {
    /// Create a fully initialized network state: genesis block, staked
    /// validators, funded user accounts.
    pub fn new(config: EngineConfig, now: u64) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut state = Self {
            config,
            blocks: Vec::new(),
            pending_transactions: Vec::new(),
            validators: BTreeMap::new(),
            miners: BTreeMap::new(),
            proposals: BTreeMap::new(),
            contracts: BTreeMap::new(),
            balances: BTreeMap::new(),
            nonces: BTreeMap::new(),
            stats: NetworkStats::default(),
            attack_patterns: VecDeque::new(),
            mining_pool: MINING_POOL_REWARDS,
            last_block_time: 0,
            ai_model: AiModel::default(),
            rng,
        };
        state.initialize_network(now);
        state
    }

    /// Seed the chain with genesis, validators and user accounts.
    fn initialize_network(&mut self, now: u64) {
        let genesis_timestamp = now.saturating_sub(86_400 * 30);
        let previous_hash = "0".repeat(64);
        let hash = Block::compute_hash(0, &[], &previous_hash, GENESIS_PROPOSER);
        self.blocks.push(Block {
            index: 0,
            timestamp: genesis_timestamp,
            transactions: Vec::new(),
            previous_hash,
            proposer: GENESIS_PROPOSER.to_string(),
            hash,
            ai_score: 1.0,
        });

        for i in 0..self.config.validator_count {
            let address = format!("neo1validator{i:02}");
            let stake = self.rng.gen_range(100_000.0..500_000.0);
            let validator = Validator {
                address: address.clone(),
                stake,
                is_active: true,
                blocks_validated: self.rng.gen_range(1_000..=50_000),
                rewards_earned: self.rng.gen_range(1_000.0..10_000.0),
                intelligence_score: self.rng.gen_range(0.7..0.99),
                registered_at: now.saturating_sub(self.rng.gen_range(86_400..=86_400 * 365)),
            };
            let funding = self.rng.gen_range(10_000.0..100_000.0);
            self.balances.insert(address.clone(), stake + funding);
            self.validators.insert(address, validator);
        }

        let staked: f64 = self.balances.values().sum();
        let circulating = TOTAL_SUPPLY - staked;
        for i in 0..self.config.user_account_count {
            let digest = Sha256::digest(i.to_string());
            let address = format!("neo1user{}", &hex::encode(digest)[..32]);
            let balance = self.rng.gen_range(100.0..circulating / 200.0);
            self.balances.insert(address, balance);
        }

        self.last_block_time = now;
    }

    /// Hand out the sender's next nonce and advance the counter.
    ///
    /// Nonces are strictly increasing per sender for the process lifetime.
    pub(crate) fn next_nonce(&mut self, sender: &str) -> u64 {
        let counter = self.nonces.entry(sender.to_string()).or_insert(0);
        let nonce = *counter;
        *counter += 1;
        nonce
    }

    /// Add `amount` to an account, creating it at zero if absent.
    pub(crate) fn credit(&mut self, address: &str, amount: f64) {
        *self.balances.entry(address.to_string()).or_insert(0.0) += amount;
    }

    /// Append to the attack-pattern log, evicting the oldest entry when
    /// the bound is reached.
    pub(crate) fn record_attack(&mut self, pattern: AttackPattern) {
        if self.attack_patterns.len() >= self.config.attack_log_capacity {
            self.attack_patterns.pop_front();
        }
        self.attack_patterns.push_back(pattern);
    }

    /// Sum of stakes across active validators.
    pub(crate) fn active_validator_stake(&self) -> f64 {
        self.validators
            .values()
            .filter(|v| v.is_active)
            .map(|v| v.stake)
            .sum()
    }

    /// The chain tip. The chain is never empty: genesis is created in
    /// `new()`.
    pub(crate) fn tip(&self) -> &Block {
        self.blocks.last().expect("chain always holds genesis")
    }

    // =========================================================================
    // READ ACCESSORS (consumed by the API layer through the service)
    // =========================================================================

    /// Snapshot of aggregate counters plus live tallies.
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            block_height: self.blocks.len() as u64,
            current_round: self.tip().index,
            validators: self.validators.values().filter(|v| v.is_active).count(),
            miners_active: self.miners.values().filter(|m| m.is_active).count(),
            total_stake: self.active_validator_stake(),
            total_supply: self.balances.values().sum(),
            total_transactions: self.stats.total_transactions,
            fraud_detected: self.stats.fraud_detected,
            attacks_prevented: self.stats.attacks_prevented,
            ai_decisions: self.stats.ai_decisions,
            dao_proposals: self.stats.dao_proposals,
            pending_transactions: self.pending_transactions.len(),
            contracts_deployed: self.contracts.len(),
            last_block_time: self.last_block_time,
            quantum_signatures_verified: self.stats.quantum_signatures_verified,
            hybrid_signatures_verified: self.stats.hybrid_signatures_verified,
            signature_algorithm: SIGNATURE_ALGORITHM.to_string(),
            ai_tasks_completed: self.stats.ai_tasks_completed,
            mining_rewards_distributed: self.stats.mining_rewards_distributed,
        }
    }

    /// Current auto-trainer status.
    pub fn ai_status(&self) -> AiStatus {
        AiStatus {
            model_version: self.ai_model.version,
            accuracy: self.ai_model.accuracy,
            training_rounds: self.ai_model.training_rounds,
            last_trained: self.ai_model.last_trained,
            fraud_detected: self.ai_model.fraud_detected_by_ai,
            total_predictions: self.ai_model.total_predictions,
        }
    }

    /// Most recent `limit` blocks, newest first.
    pub fn recent_blocks(&self, limit: usize) -> Vec<Block> {
        self.blocks.iter().rev().take(limit).cloned().collect()
    }

    /// All validators, highest stake first.
    pub fn validators_by_stake(&self) -> Vec<Validator> {
        let mut validators: Vec<Validator> = self.validators.values().cloned().collect();
        validators.sort_by(|a, b| b.stake.total_cmp(&a.stake));
        validators
    }

    /// All registered miners.
    pub fn miner_list(&self) -> Vec<Miner> {
        self.miners.values().cloned().collect()
    }

    /// All proposals.
    pub fn proposal_list(&self) -> Vec<Proposal> {
        self.proposals.values().cloned().collect()
    }

    /// Balance of an account, zero if unknown.
    pub fn balance(&self, address: &str) -> f64 {
        self.balances.get(address).copied().unwrap_or(0.0)
    }

    /// Remaining mining reward pool.
    pub fn mining_pool_balance(&self) -> f64 {
        self.mining_pool
    }

    /// Transactions currently awaiting inclusion.
    pub fn pending(&self) -> &[Transaction] {
        &self.pending_transactions
    }
}
