//! # Engine Service
//!
//! Owns the shared ledger store and the two background loops: the block
//! producer and the AI auto-trainer. All public operations go through the
//! store's single write lock, so every state transition is atomic with
//! respect to every other.
//!
//! Shutdown is cooperative: `stop()` flips a watch channel and both loops
//! exit at their next `select!` poll.

use crate::config::EngineConfig;
use crate::domain::{self, LedgerState};
use crate::error::Result;
use parking_lot::RwLock;
use shared_types::{
    AiStatus, Block, Miner, NetworkSnapshot, Proposal, TrainingSample, Transaction, Validator,
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Seconds since the Unix epoch.
///
/// The simulation clock never runs before 1970, so the fallback is
/// unreachable in practice but avoids a panic path.
fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// The Proof-of-Intelligence ledger simulation engine.
///
/// Cheap to clone; clones share the same store and lifecycle.
#[derive(Clone)]
pub struct PoiEngine {
    state: Arc<RwLock<LedgerState>>,
    config: EngineConfig,
    shutdown_tx: Arc<watch::Sender<bool>>,
    handles: Arc<parking_lot::Mutex<Vec<JoinHandle<()>>>>,
}

impl PoiEngine {
    /// Build an engine with a fully initialized genesis network.
    pub fn new(config: EngineConfig) -> Self {
        let state = LedgerState::new(config.clone(), now_unix());
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            state: Arc::new(RwLock::new(state)),
            config,
            shutdown_tx: Arc::new(shutdown_tx),
            handles: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    /// Spawn the block producer and auto-trainer loops.
    ///
    /// Idempotent-ish: calling twice spawns a second pair of loops, so
    /// callers are expected to start once. Both loops log and retry after
    /// a backoff instead of dying.
    pub fn start(&self) {
        info!(
            "[poi-engine] starting: block interval {:?}, training interval {:?}",
            self.config.block_interval(),
            self.config.training_interval()
        );

        let mut handles = self.handles.lock();
        handles.push(self.spawn_block_loop());
        handles.push(self.spawn_training_loop());
    }

    /// Signal shutdown and wait for both loops to drain.
    pub async fn stop(&self) {
        info!("[poi-engine] shutdown requested");
        // Receivers may already be gone if start() was never called.
        let _ = self.shutdown_tx.send(true);

        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("[poi-engine] loop task failed to join: {e}");
            }
        }
        info!("[poi-engine] stopped");
    }

    fn spawn_block_loop(&self) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let interval = self.config.block_interval();
        let backoff = self.config.retry_backoff();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let produced = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                            let mut guard = state.write();
                            domain::producer::produce_block(&mut guard, now_unix());
                        }));
                        if produced.is_err() {
                            error!("[poi-engine] block production panicked; backing off");
                            tokio::time::sleep(backoff).await;
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        info!("[poi-engine] block loop draining");
                        break;
                    }
                }
            }
        })
    }

    fn spawn_training_loop(&self) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let interval = self.config.training_interval();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // Skip the immediate first tick so training never races genesis.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let mut guard = state.write();
                        domain::training::auto_train(&mut guard, now_unix());
                    }
                    _ = shutdown_rx.changed() => {
                        info!("[poi-engine] training loop draining");
                        break;
                    }
                }
            }
        })
    }

    // ---- write operations -------------------------------------------------

    /// Produce one block immediately, outside the scheduler.
    pub fn produce_block(&self) -> Block {
        domain::producer::produce_block(&mut self.state.write(), now_unix())
    }

    /// Create a governance proposal.
    pub fn create_proposal(&self, title: &str, description: &str, proposer: &str) -> Proposal {
        domain::governance::create_proposal(
            &mut self.state.write(),
            title,
            description,
            proposer,
            now_unix(),
        )
    }

    /// Cast a stake-weighted vote on a proposal.
    pub fn vote(
        &self,
        proposal_id: &str,
        voter: &str,
        support: bool,
        stake_weight: f64,
    ) -> Result<domain::VoteReceipt> {
        domain::governance::vote(&mut self.state.write(), proposal_id, voter, support, stake_weight)
    }

    /// Register a worker miner.
    pub fn register_miner(
        &self,
        address: &str,
        cpu_cores: u32,
        gpu_memory_mb: u64,
        endpoint: Option<&str>,
    ) -> Result<Miner> {
        domain::mining::register_miner(
            &mut self.state.write(),
            address,
            cpu_cores,
            gpu_memory_mb,
            endpoint,
            now_unix(),
        )
    }

    /// Pay a miner for a completed task.
    pub fn submit_task_result(
        &self,
        miner_address: &str,
        task_id: &str,
        accuracy: f64,
        completion: f64,
    ) -> Result<domain::TaskReward> {
        domain::mining::submit_task_result(
            &mut self.state.write(),
            miner_address,
            task_id,
            accuracy,
            completion,
            now_unix(),
        )
    }

    /// Deploy a contract.
    pub fn deploy_contract(
        &self,
        code: &str,
        runtime: &str,
        deployer: &str,
    ) -> Result<domain::DeploymentReceipt> {
        domain::contracts::deploy_contract(&mut self.state.write(), code, runtime, deployer, now_unix())
    }

    /// Run one auto-training round immediately.
    pub fn train_now(&self) {
        domain::training::auto_train(&mut self.state.write(), now_unix());
    }

    // ---- read operations --------------------------------------------------

    /// Point-in-time view of the network counters.
    pub fn network_stats(&self) -> NetworkSnapshot {
        self.state.read().snapshot()
    }

    /// AI model status.
    pub fn ai_status(&self) -> AiStatus {
        self.state.read().ai_status()
    }

    /// The most recent `limit` blocks, newest first.
    pub fn recent_blocks(&self, limit: usize) -> Vec<Block> {
        self.state.read().recent_blocks(limit)
    }

    /// Validators ordered by stake, highest first.
    pub fn validators(&self) -> Vec<Validator> {
        self.state.read().validators_by_stake()
    }

    /// All registered miners.
    pub fn miners(&self) -> Vec<Miner> {
        self.state.read().miner_list()
    }

    /// All proposals, any status.
    pub fn proposals(&self) -> Vec<Proposal> {
        self.state.read().proposal_list()
    }

    /// Balance of an address, zero if unknown.
    pub fn balance(&self, address: &str) -> f64 {
        self.state.read().balance(address)
    }

    /// Remaining mining reward pool.
    pub fn mining_pool_balance(&self) -> f64 {
        self.state.read().mining_pool_balance()
    }

    /// Transactions waiting for the next block.
    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.state.read().pending().to_vec()
    }

    /// Labeled training samples from recent history.
    pub fn training_data(&self, limit: usize) -> Vec<TrainingSample> {
        domain::training::training_data(&self.state.read(), limit)
    }
}
