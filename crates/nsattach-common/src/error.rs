//! Unified error types for the nsattach workspace.
//!
//! Every failure in the attach pipeline maps to one of four categories,
//! reported by [`AttachError::kind`]. All of them are terminal for the
//! request; nothing in this workspace retries.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum AttachError {
    /// An ambient parameter is malformed.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid parameter.
        message: String,
    },

    /// The namespace argument cannot be resolved to an absolute path.
    #[error("cannot resolve namespace path \"{path}\": {message}")]
    Path {
        /// Namespace argument as supplied by the caller.
        path: String,
        /// Reason the resolution failed.
        message: String,
    },

    /// A network configuration file or directory is unreadable or invalid.
    #[error("error loading network configuration from {dir}: {message}")]
    Load {
        /// Directory or file being loaded.
        dir: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// No configuration with the requested network name exists.
    #[error("no net configuration with name \"{name}\" in {dir}")]
    NetworkNotFound {
        /// Directory that was searched.
        dir: PathBuf,
        /// Requested network name.
        name: String,
    },

    /// Failure surfaced unchanged from the network orchestrator.
    #[error(transparent)]
    Orchestrator(Box<dyn std::error::Error + Send + Sync>),
}

impl AttachError {
    /// Wraps an orchestrator failure without altering its message or source chain.
    pub fn orchestrator(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Orchestrator(err.into())
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::Path { .. } => ErrorKind::Path,
            Self::Load { .. } | Self::NetworkNotFound { .. } => ErrorKind::Load,
            Self::Orchestrator(_) => ErrorKind::Orchestrator,
        }
    }
}

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed ambient parameters.
    Config,
    /// Unresolvable namespace argument.
    Path,
    /// Missing or invalid network configuration list.
    Load,
    /// Failure reported by the plugin chain.
    Orchestrator,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => write!(f, "config"),
            Self::Path => write!(f, "path"),
            Self::Load => write!(f, "load"),
            Self::Orchestrator => write!(f, "orchestrator"),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, AttachError>;
