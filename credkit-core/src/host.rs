//! The host seam for interactive resolutions.
//!
//! The host is whatever environment can put UI in front of the user: a
//! mobile shell, a desktop window, a test harness. The flow only asks it to
//! start a resolution; the result comes back later through
//! [`crate::CredentialFlow::on_resolution_complete`], tagged with the
//! [`OperationKind`] the launch carried.

use thiserror::Error;

use crate::{Identity, OperationKind, OutcomeStatus};

/// Error returned when the host cannot start an interactive resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("resolution_launch: {reason}")]
pub struct LaunchError {
    /// Why the interactive request could not be delivered.
    pub reason: String,
}

impl LaunchError {
    /// Creates a launch error with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Starts interactive resolution steps on behalf of the flow.
///
/// Implemented by the embedding host. `launch` must return without blocking
/// on the user; the eventual outcome is delivered out-of-band, correlated by
/// the `kind` tag passed here.
pub trait ResolutionHost: Send + Sync {
    /// Starts the interactive resolution described by `status`, tagged with
    /// `kind` for correlation of the later-delivered outcome.
    ///
    /// # Errors
    ///
    /// Returns a [`LaunchError`] if the interactive request cannot be
    /// delivered to the user at all (the resolution is then never considered
    /// pending).
    fn launch(&self, status: &OutcomeStatus, kind: OperationKind) -> Result<(), LaunchError>;
}

/// The out-of-band result of an interactive resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The user completed a read or hint picker and a credential subject was
    /// returned.
    Retrieved(Identity),
    /// The interactive step completed without a payload, e.g. a save
    /// confirmation.
    Confirmed,
    /// The user dismissed or declined the interactive step.
    Canceled,
}
