use thiserror::Error;

use crate::protocol::ErrorKind;

/// Why a submitted frame did not come back.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The worker ran the request and reported a failure.
    #[error("request {id} failed ({kind}): {message}")]
    Remote {
        id: u64,
        kind: ErrorKind,
        message: String,
        trace: Option<String>,
    },

    /// The worker went away before answering.
    #[error("request {id}: {reason}")]
    Transport { id: u64, reason: String },

    #[error("request {id} was cancelled")]
    Cancelled { id: u64 },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

impl ProcessError {
    pub fn id(&self) -> Option<u64> {
        match self {
            Self::Remote { id, .. } | Self::Transport { id, .. } | Self::Cancelled { id } => {
                Some(*id)
            }
            Self::Spawn(_) => None,
        }
    }

    /// Wire kind for errors that have one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Remote { kind, .. } => Some(*kind),
            Self::Transport { .. } => Some(ErrorKind::Transport),
            Self::Cancelled { .. } | Self::Spawn(_) => None,
        }
    }
}
