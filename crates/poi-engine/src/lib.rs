//! # Proof-of-Intelligence Ledger Simulation Engine
//!
//! Simulates a PoI blockchain end to end: synthetic transaction traffic
//! (including scripted attack patterns), a block producer with a
//! stake-times-intelligence proposer lottery and heuristic AI block
//! scoring, AI-weighted DAO governance, a fixed-pool mining reward
//! engine, contract deployment bookkeeping, and a periodic auto-trainer.
//!
//! ## Invariants
//!
//! - Supply conservation: balances + remaining pool never exceed the
//!   fixed total supply; pool payouts debit before they credit.
//! - Chain linkage: every committed block's `previous_hash` is the hash
//!   of the block before it; rejected blocks leave no trace beyond the
//!   `attacks_prevented` counter.
//! - Single writer: all mutation happens under one write lock, so every
//!   check-then-mutate sequence is atomic.
//!
//! ## Module structure
//!
//! - [`domain`] — pure state transitions over [`domain::LedgerState`]
//! - [`service`] — the [`PoiEngine`] handle and its scheduler loops
//! - [`config`] / [`error`] — knobs and the error taxonomy

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use config::{EngineConfig, MINING_POOL_REWARDS, TOTAL_SUPPLY};
pub use error::{EngineError, ErrorKind, Result};
pub use service::PoiEngine;
