//! Domain logic of the ledger simulation.
//!
//! Every function in here takes `&LedgerState` or `&mut LedgerState` and
//! performs no I/O and no locking; the service layer owns the lock and
//! the clock.

pub mod contracts;
pub mod governance;
pub mod mining;
pub mod producer;
pub mod state;
pub mod synthesizer;
pub mod training;

pub use contracts::DeploymentReceipt;
pub use governance::VoteReceipt;
pub use mining::TaskReward;
pub use state::LedgerState;
