//! # Core Domain Entities
//!
//! Defines the core entities of the NeoNet PoI ledger simulation.
//!
//! ## Clusters
//!
//! - **Chain**: `Transaction`, `TxType`, `Block`
//! - **Consensus & Mining**: `Validator`, `Miner`
//! - **Governance**: `Proposal`, `ProposalStatus`, `AiRecommendation`
//! - **Contracts**: `Contract`, `ContractRuntime`
//! - **AI & Training**: `AiModel`, `AiStatus`, `TrainingSample`, `AttackPattern`
//! - **Aggregates**: `NetworkStats`, `NetworkSnapshot`

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// Address of the genesis proposer, used as the lottery fallback when no
/// validator is active.
pub const GENESIS_PROPOSER: &str = "neo1genesis";

/// Address that reward transactions are paid out from.
pub const MINING_POOL_ADDRESS: &str = "neo1mining_pool";

/// Label attached to every pseudo-signed transaction.
pub const SIGNATURE_ALGORITHM: &str = "Hybrid-Ed25519+Dilithium3";

/// Minimum hex length a pseudo-signature must have to count as present.
///
/// The verification flag is a structural predicate over signature lengths,
/// not cryptographic validation. Downstream training-data export depends on
/// this exact behavior.
pub const MIN_SIGNATURE_LEN: usize = 64;

/// The category of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxType {
    /// Plain value transfer.
    Transfer,
    /// Call into a deployed contract.
    ContractCall,
    /// Stake tokens with a validator.
    Stake,
    /// Withdraw staked tokens.
    Unstake,
    /// Governance action (proposal/vote payload).
    Governance,
    /// Contract deployment.
    ContractDeploy,
    /// Payout from the mining reward pool.
    MiningReward,
}

impl TxType {
    /// Canonical snake_case name, used in metadata and feature extraction.
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Transfer => "transfer",
            TxType::ContractCall => "contract_call",
            TxType::Stake => "stake",
            TxType::Unstake => "unstake",
            TxType::Governance => "governance",
            TxType::ContractDeploy => "contract_deploy",
            TxType::MiningReward => "mining_reward",
        }
    }
}

/// How far a transaction's pseudo-signature set was verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationLevel {
    /// Classical signature only.
    Classical,
    /// Classical + quantum layers present, dilithium missing or short.
    Quantum,
    /// All three signature layers present.
    Hybrid,
}

/// A ledger transaction. All transactions carry hybrid pseudo-signatures.
///
/// Immutable once created, except `is_verified`/`verification_level` which
/// are set exactly once by [`Transaction::verify_hybrid_signature`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction id (sha256 hex).
    pub hash: String,
    /// Sender address.
    pub sender: String,
    /// Recipient address.
    pub recipient: String,
    /// Transferred amount, never negative.
    pub amount: f64,
    /// Gas price offered by the sender.
    pub gas_price: f64,
    /// Gas consumed by execution.
    pub gas_used: u64,
    /// Transaction category.
    pub tx_type: TxType,
    /// Unix timestamp (seconds) at creation.
    pub timestamp: u64,
    /// Per-sender monotonic nonce (replay protection).
    pub nonce: u64,
    /// Classical pseudo-signature (sha256 hex).
    pub evm_signature: String,
    /// Quantum-layer pseudo-signature (sha256 hex).
    pub quantum_signature: String,
    /// Post-quantum pseudo-signature (sha512 hex).
    pub dilithium_signature: String,
    /// Signature scheme label.
    pub signature_algorithm: String,
    /// Set once by the structural verification predicate.
    pub is_verified: bool,
    /// Verification depth reached.
    pub verification_level: VerificationLevel,
    /// Fraud label assigned by the synthesizer.
    pub is_fraud: bool,
    /// Fraud risk in [0, 1], exported as a training label.
    pub fraud_score: f64,
    /// Opaque metadata bag (attack subtype, contract address, task id, ...).
    pub metadata: BTreeMap<String, String>,
}

impl Transaction {
    /// Verify the hybrid pseudo-signature set.
    ///
    /// This is a deterministic structural check over signature lengths, not
    /// cryptographic validation: the transaction is verified iff both the
    /// classical and the quantum signature meet [`MIN_SIGNATURE_LEN`]. A
    /// missing dilithium layer downgrades the level to `Quantum` but does
    /// not fail verification.
    pub fn verify_hybrid_signature(&mut self) -> bool {
        if self.evm_signature.is_empty() || self.quantum_signature.is_empty() {
            return false;
        }
        let has_classical = self.evm_signature.len() >= MIN_SIGNATURE_LEN;
        let has_quantum = self.quantum_signature.len() >= MIN_SIGNATURE_LEN;
        let has_dilithium = self.dilithium_signature.is_empty()
            || self.dilithium_signature.len() >= MIN_SIGNATURE_LEN;

        self.is_verified = has_classical && has_quantum;
        self.verification_level = if has_dilithium {
            VerificationLevel::Hybrid
        } else {
            VerificationLevel::Quantum
        };
        self.is_verified
    }

    /// Extract the fixed 10-element feature vector used for training export.
    pub fn to_features(&self) -> Vec<f64> {
        vec![
            self.amount,
            self.gas_price,
            self.gas_used as f64,
            if self.tx_type == TxType::Transfer { 1.0 } else { 0.0 },
            if self.tx_type == TxType::ContractCall { 1.0 } else { 0.0 },
            if self.tx_type == TxType::Stake { 1.0 } else { 0.0 },
            self.sender.len() as f64,
            self.recipient.len() as f64,
            (self.timestamp % 86_400) as f64 / 86_400.0,
            if self.is_verified { 1.0 } else { 0.0 },
        ]
    }
}

/// A committed (or candidate) block. Immutable once appended to the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Block height, contiguous from 0 (genesis).
    pub index: u64,
    /// Unix timestamp (seconds) at production.
    pub timestamp: u64,
    /// Ordered transactions bundled into this block.
    pub transactions: Vec<Transaction>,
    /// Hash of the predecessor block (chain linkage).
    pub previous_hash: String,
    /// Address of the validator selected by the weighted lottery.
    pub proposer: String,
    /// Own hash, a pure function of index, tx hashes, previous hash and
    /// proposer.
    pub hash: String,
    /// Heuristic AI validation score in [0, 1].
    pub ai_score: f64,
}

impl Block {
    /// Compute a block hash from its identity fields.
    pub fn compute_hash(
        index: u64,
        transactions: &[Transaction],
        previous_hash: &str,
        proposer: &str,
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(index.to_string());
        for tx in transactions {
            hasher.update(&tx.hash);
        }
        hasher.update(previous_hash);
        hasher.update(proposer);
        hex::encode(hasher.finalize())
    }
}

// =============================================================================
// CLUSTER B: CONSENSUS & MINING
// =============================================================================

/// A staked validator participating in the PoI lottery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validator {
    /// Validator address.
    pub address: String,
    /// Staked amount, always positive.
    pub stake: f64,
    /// Whether the validator participates in the lottery.
    pub is_active: bool,
    /// Cumulative count of blocks this validator committed.
    pub blocks_validated: u64,
    /// Cumulative proposer rewards.
    pub rewards_earned: f64,
    /// Heuristic intelligence score in [0, 1], capped at 0.99.
    ///
    /// Drifts upward with blocks validated during auto-training.
    pub intelligence_score: f64,
    /// Unix timestamp of registration.
    pub registered_at: u64,
}

/// A worker miner paid from the reward pool for submitted task results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Miner {
    /// Miner address.
    pub address: String,
    /// Declared CPU core count.
    pub cpu_cores: u32,
    /// Declared GPU memory in MiB.
    pub gpu_memory_mb: u64,
    /// Worker endpoint advertised at registration.
    pub endpoint: String,
    /// Unix timestamp of registration.
    pub registered_at: u64,
    /// Inactive miners cannot submit task results.
    pub is_active: bool,
    /// Number of accepted task submissions.
    pub tasks_completed: u64,
    /// Cumulative rewards paid out of the pool.
    pub rewards_earned: f64,
    /// Accumulated quality contribution across tasks.
    pub intelligence_contribution: f64,
    /// Unix timestamp of the last accepted task.
    pub last_task_at: u64,
}

// =============================================================================
// CLUSTER C: GOVERNANCE
// =============================================================================

/// Fraction of the resolution decision carried by the AI recommendation.
pub const AI_VOTE_WEIGHT: f64 = 0.3;

/// Voting window length: 7 days in seconds.
pub const VOTING_PERIOD_SECS: u64 = 7 * 86_400;

/// Lifecycle state of a governance proposal.
///
/// Transitions only `Active -> Passed` or `Active -> Rejected`, never
/// reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Accepting votes.
    Active,
    /// Resolved in favor.
    Passed,
    /// Resolved against.
    Rejected,
}

/// AI stance on a proposal, derived from keyword analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiRecommendation {
    /// Positive keywords dominated.
    For,
    /// Negative keywords dominated.
    Against,
    /// Tie, or no keywords found.
    Neutral,
}

/// A DAO governance proposal with an AI-weighted vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    /// Short hash id (16 hex chars).
    pub id: String,
    /// Proposal title.
    pub title: String,
    /// Proposal body.
    pub description: String,
    /// Proposing address.
    pub proposer: String,
    /// Unix timestamp of creation.
    pub created_at: u64,
    /// `created_at` + 7 days.
    pub voting_ends_at: u64,
    /// Current lifecycle state.
    pub status: ProposalStatus,
    /// Accumulated stake weight voting for.
    pub for_votes: f64,
    /// Accumulated stake weight voting against.
    pub against_votes: f64,
    /// AI stance from keyword analysis.
    pub ai_recommendation: AiRecommendation,
    /// AI confidence in [0.5, 0.9].
    pub ai_confidence: f64,
    /// Fixed AI share of the decision (0.3).
    pub ai_weight: f64,
}

// =============================================================================
// CLUSTER D: CONTRACTS
// =============================================================================

/// Runtime kind a contract targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractRuntime {
    /// EVM bytecode.
    Evm,
    /// WebAssembly.
    Wasm,
    /// Dual EVM/Wasm deployment.
    Hybrid,
}

impl ContractRuntime {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractRuntime::Evm => "evm",
            ContractRuntime::Wasm => "wasm",
            ContractRuntime::Hybrid => "hybrid",
        }
    }
}

/// Error returned when parsing an unsupported runtime kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown contract runtime: {0} (expected 'evm', 'wasm' or 'hybrid')")]
pub struct UnknownRuntime(pub String);

impl FromStr for ContractRuntime {
    type Err = UnknownRuntime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "evm" => Ok(ContractRuntime::Evm),
            "wasm" => Ok(ContractRuntime::Wasm),
            "hybrid" => Ok(ContractRuntime::Hybrid),
            other => Err(UnknownRuntime(other.to_string())),
        }
    }
}

/// A deployed contract record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    /// Contract address (`neo1contract` + 30 hex chars).
    pub address: String,
    /// Target runtime.
    pub runtime: ContractRuntime,
    /// Deploying address.
    pub deployer: String,
    /// sha256 hex of the deployed code.
    pub code_hash: String,
    /// Unix timestamp of deployment.
    pub deployed_at: u64,
    /// Calls routed to this contract so far.
    pub tx_count: u64,
}

// =============================================================================
// CLUSTER E: AI & TRAINING
// =============================================================================

/// Subtype of a synthesized attack transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    /// Very large borrowed-amount transfer.
    FlashLoan,
    /// Recursive contract call pattern.
    Reentrancy,
    /// Front/back-run pair around a victim transaction.
    Sandwich,
    /// Many near-zero-value transfers.
    Dust,
}

impl AttackType {
    /// Canonical snake_case name, used in metadata and feature extraction.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttackType::FlashLoan => "flash_loan",
            AttackType::Reentrancy => "reentrancy",
            AttackType::Sandwich => "sandwich",
            AttackType::Dust => "dust",
        }
    }
}

/// Entry in the bounded attack-pattern log, consumed by training export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackPattern {
    /// Attack subtype.
    pub attack_type: AttackType,
    /// Hash of the attack transaction.
    pub tx_hash: String,
    /// Unix timestamp of the attack.
    pub timestamp: u64,
    /// Attack transaction amount.
    pub amount: f64,
}

/// One labeled sample for fraud-model training export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Fixed 10-element feature vector.
    pub features: Vec<f64>,
    /// Fraud label.
    pub is_fraud: bool,
    /// Fraud score in [0, 1].
    pub fraud_score: f64,
    /// Source transaction hash.
    pub tx_hash: String,
    /// Containing block, if the sample came from the chain.
    pub block_index: Option<u64>,
    /// Attack subtype, if the sample came from the attack log.
    pub attack_type: Option<AttackType>,
}

/// Mutable state of the heuristic fraud model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiModel {
    /// Model version counter.
    pub version: u32,
    /// Synthetic accuracy metric, bounded at 0.99.
    pub accuracy: f64,
    /// Completed training rounds.
    pub training_rounds: u64,
    /// Unix timestamp of the last round.
    pub last_trained: u64,
    /// Fraud samples seen across all rounds.
    pub fraud_detected_by_ai: u64,
    /// Samples consumed across all rounds.
    pub total_predictions: u64,
}

impl Default for AiModel {
    fn default() -> Self {
        Self {
            version: 1,
            accuracy: 0.75,
            training_rounds: 0,
            last_trained: 0,
            fraud_detected_by_ai: 0,
            total_predictions: 0,
        }
    }
}

/// Point-in-time view of the auto-trainer, for the API layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiStatus {
    /// Model version counter.
    pub model_version: u32,
    /// Current synthetic accuracy.
    pub accuracy: f64,
    /// Completed training rounds.
    pub training_rounds: u64,
    /// Unix timestamp of the last round.
    pub last_trained: u64,
    /// Fraud samples seen across all rounds.
    pub fraud_detected: u64,
    /// Samples consumed across all rounds.
    pub total_predictions: u64,
}

// =============================================================================
// CLUSTER F: AGGREGATES
// =============================================================================

/// Aggregate counters, only mutated by the operations that also change the
/// underlying entities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkStats {
    /// Transactions ever synthesized or issued.
    pub total_transactions: u64,
    /// Transactions flagged as fraud at creation.
    pub fraud_detected: u64,
    /// Blocks rejected by the AI score threshold.
    pub attacks_prevented: u64,
    /// Heuristic scoring/training decisions taken.
    pub ai_decisions: u64,
    /// Proposals ever created.
    pub dao_proposals: u64,
    /// Total rewards paid out of the mining pool.
    pub mining_rewards_distributed: f64,
    /// Quantum-layer signatures structurally verified.
    pub quantum_signatures_verified: u64,
    /// Hybrid signature sets structurally verified.
    pub hybrid_signatures_verified: u64,
    /// Accepted mining task submissions.
    pub ai_tasks_completed: u64,
}

/// Idempotent snapshot of aggregate counters plus live tallies.
///
/// Two consecutive snapshots with no intervening mutation compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// Number of blocks on the chain (including genesis).
    pub block_height: u64,
    /// Index of the chain tip.
    pub current_round: u64,
    /// Active validator count.
    pub validators: usize,
    /// Active miner count.
    pub miners_active: usize,
    /// Sum of active validator stakes.
    pub total_stake: f64,
    /// Circulating supply (sum of all balances).
    pub total_supply: f64,
    /// Transactions ever issued.
    pub total_transactions: u64,
    /// Transactions flagged as fraud.
    pub fraud_detected: u64,
    /// Blocks rejected by the score threshold.
    pub attacks_prevented: u64,
    /// Heuristic decisions taken.
    pub ai_decisions: u64,
    /// Proposals ever created.
    pub dao_proposals: u64,
    /// Transactions waiting in the pending set.
    pub pending_transactions: usize,
    /// Deployed contract count.
    pub contracts_deployed: usize,
    /// Unix timestamp of the last production attempt.
    pub last_block_time: u64,
    /// Quantum-layer signatures verified.
    pub quantum_signatures_verified: u64,
    /// Hybrid signature sets verified.
    pub hybrid_signatures_verified: u64,
    /// Signature scheme label.
    pub signature_algorithm: String,
    /// Accepted mining task submissions.
    pub ai_tasks_completed: u64,
    /// Total rewards paid out of the mining pool.
    pub mining_rewards_distributed: f64,
}
