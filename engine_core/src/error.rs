use std::path::PathBuf;

use thiserror::Error;

use crate::phase::FramePhase;

/// Problems found in the configuration before anything is initialized.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target rate must be a positive finite number, got {0}")]
    InvalidRate(f64),

    #[error("target rate {0} leaves a frame budget below 1ms")]
    BudgetTooSmall(f64),

    #[error("target rate {0} gives a frame budget too large to represent")]
    BudgetTooLarge(f64),

    #[error("device backend name is empty")]
    EmptyBackend,

    #[error("max_logic_steps_per_frame must be at least 1")]
    ZeroStepCap,

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Engine-wide error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to initialize device backend '{backend}': {reason}")]
    Init { backend: String, reason: String },

    #[error("engine already initialized")]
    AlreadyInitialized,

    #[error("{phase} failed: {source}")]
    Phase {
        phase: FramePhase,
        #[source]
        source: Box<EngineError>,
    },

    #[error("{0}")]
    Other(String),
}

impl EngineError {
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Attributes `err` to `phase`. Already-attributed errors keep their original phase.
    pub fn in_phase(phase: FramePhase, err: EngineError) -> Self {
        match err {
            e @ EngineError::Phase { .. } => e,
            other => EngineError::Phase {
                phase,
                source: Box::new(other),
            },
        }
    }

    /// Phase the error happened in, if it came out of the loop.
    pub fn phase(&self) -> Option<FramePhase> {
        match self {
            EngineError::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

impl From<&str> for EngineError {
    #[inline]
    fn from(value: &str) -> Self {
        EngineError::Other(value.to_string())
    }
}

impl From<String> for EngineError {
    #[inline]
    fn from(value: String) -> Self {
        EngineError::Other(value)
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
