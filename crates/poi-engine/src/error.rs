//! Error types for the simulation engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Coarse classification of an [`EngineError`].
///
/// Mirrors the four error categories the API layer maps onto response
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced entity does not exist.
    NotFound,
    /// Entity exists but refuses the operation in its current state.
    InvalidState,
    /// A bounded resource cannot cover the request.
    ResourceExhausted,
    /// Caller supplied an unsupported argument.
    InvalidArgument,
}

/// Errors that can occur during engine operations.
///
/// All variants are recoverable: they are returned to the caller and never
/// terminate the scheduling loops.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Unknown proposal id.
    #[error("Proposal not found: {0}")]
    ProposalNotFound(String),

    /// Vote on a proposal that already resolved.
    #[error("Proposal {0} is not active")]
    ProposalNotActive(String),

    /// Unknown miner address.
    #[error("Miner not registered: {0}")]
    MinerNotFound(String),

    /// Task submission from a deactivated miner.
    #[error("Miner is inactive: {0}")]
    MinerInactive(String),

    /// Duplicate miner registration.
    #[error("Miner already registered: {0}")]
    MinerAlreadyRegistered(String),

    /// Mining pool cannot cover the computed reward.
    #[error("Mining pool exhausted: need {requested:.4}, have {available:.4}")]
    PoolExhausted {
        /// Reward the submission would earn.
        requested: f64,
        /// Remaining pool balance.
        available: f64,
    },

    /// Unsupported contract runtime kind.
    #[error("Invalid runtime '{0}': use 'evm', 'wasm' or 'hybrid'")]
    UnsupportedRuntime(String),
}

impl EngineError {
    /// Map the variant onto its error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProposalNotFound(_) | Self::MinerNotFound(_) => ErrorKind::NotFound,
            Self::ProposalNotActive(_) | Self::MinerInactive(_) | Self::MinerAlreadyRegistered(_) => {
                ErrorKind::InvalidState
            }
            Self::PoolExhausted { .. } => ErrorKind::ResourceExhausted,
            Self::UnsupportedRuntime(_) => ErrorKind::InvalidArgument,
        }
    }
}
