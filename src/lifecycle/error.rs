//! Lifecycle-specific error types

use crate::error::BootwrightError;
use thiserror::Error;

/// Errors that abort a bootstrap run
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A synchronous hook failed, or its arguments could not be resolved
    #[error("Hook {bootstrapper}.{hook} failed: {source}")]
    HookFailed {
        /// Full name of the bootstrapper
        bootstrapper: String,
        /// Name of the hook method
        hook: String,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// The host could not build the application
    #[error("Building the application failed: {0}")]
    Build(#[from] BootwrightError),

    /// Asynchronous hooks need a Tokio runtime to run on
    #[error("Bootstrapping must run inside a Tokio runtime")]
    NoRuntime,

    /// Operation timed out
    #[error("Timeout during {phase}: {message}")]
    Timeout {
        /// The lifecycle phase where timeout occurred
        phase: String,
        /// Additional error message
        message: String,
    },
}

impl LifecycleError {
    /// Create a hook failure error
    pub fn hook_failed(
        bootstrapper: impl Into<String>,
        hook: impl Into<String>,
        source: anyhow::Error,
    ) -> Self {
        Self::HookFailed {
            bootstrapper: bootstrapper.into(),
            hook: hook.into(),
            source: source.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(phase: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timeout {
            phase: phase.into(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;
