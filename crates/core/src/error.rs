//! Unified error types for the supplementary archive.
//!
//! Error codes:
//! - CFG_001-002: Source configuration errors
//! - NET_001: Transient provider transport errors
//! - DEC_001: Provider payload decode errors
//! - STORE_001-003: Persistence and retention errors

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Storage error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// STORE_001: A single storage operation failed
    OperationFailed,
    /// STORE_002: Save retries exhausted
    SaveExhausted,
    /// STORE_003: Prune retries exhausted
    PruneExhausted,
}

impl StoreErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OperationFailed => "STORE_001",
            Self::SaveExhausted => "STORE_002",
            Self::PruneExhausted => "STORE_003",
        }
    }
}

/// Unified error type for the supplementary archive.
#[derive(Debug, Error)]
pub enum Error {
    /// Timeout, connection failure or non-success HTTP status. Retried.
    #[error("[NET_001] transport error: {0}")]
    Transport(String),

    /// Provider payload is malformed or lacks expected fields.
    #[error("[DEC_001] decode error: {0}")]
    Decode(String),

    #[error("[CFG_001] configuration error: {0}")]
    Config(String),

    #[error("[CFG_002] missing credential for source '{0}'")]
    MissingCredential(String),

    #[error("[STORE_001] store error: {0}")]
    Store(String),

    #[error("[STORE_002] save of record {timestamp} failed after {attempts} attempts: {last_error}")]
    SaveFailed {
        timestamp: i64,
        attempts: u32,
        last_error: String,
    },

    #[error("[STORE_003] prune before {cutoff} failed after {attempts} attempts: {last_error}")]
    PruneFailed {
        cutoff: i64,
        attempts: u32,
        last_error: String,
    },
}

impl Error {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn missing_credential(source: impl Into<String>) -> Self {
        Self::MissingCredential(source.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Whether a retry of the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Store(_))
    }

    /// Whether the error came from source construction.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::MissingCredential(_))
    }

    /// Get the storage error code if this is a storage error.
    pub fn store_code(&self) -> Option<&'static str> {
        match self {
            Self::Store(_) => Some(StoreErrorCode::OperationFailed.code()),
            Self::SaveFailed { .. } => Some(StoreErrorCode::SaveExhausted.code()),
            Self::PruneFailed { .. } => Some(StoreErrorCode::PruneExhausted.code()),
            _ => None,
        }
    }
}
