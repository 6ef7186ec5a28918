//! At-most-one interactive resolution, correlated by operation kind.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

use crate::{FlowError, OutcomeStatus, ResolutionHost};

/// Tag identifying which logical operation an interactive resolution was
/// launched for, so its eventual outcome is routed correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// A credential save awaiting user confirmation.
    Save,
    /// A hint pick: identifier-only suggestion.
    ResolveHint,
    /// A credential pick among multiple stored credentials.
    ResolveRead,
}

/// The single outstanding interactive resolution, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResolution {
    /// The operation the resolution was launched for.
    pub kind: OperationKind,
}

/// How a [`ResolutionCoordinator::try_resolve`] call was disposed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveDisposition {
    /// The interactive resolution was launched and is now pending.
    Launched,
    /// Another resolution is already pending; this call was a no-op.
    AlreadyPending,
}

/// Owns the single in-flight resolution flag and the host seam.
///
/// Guarantees at most one interactive resolution is ever outstanding:
/// stacked prompts after rotation-equivalent re-entry were the failure mode
/// of the shared-boolean scheme this replaces.
#[derive(Clone)]
pub struct ResolutionCoordinator {
    host: Arc<dyn ResolutionHost>,
    pending: Option<PendingResolution>,
}

impl ResolutionCoordinator {
    /// Creates a coordinator launching resolutions through `host`.
    #[must_use]
    pub fn new(host: Arc<dyn ResolutionHost>) -> Self {
        Self {
            host,
            pending: None,
        }
    }

    /// Attempts to resolve a non-successful `status` interactively.
    ///
    /// A call while a resolution is pending is a logged no-op
    /// ([`ResolveDisposition::AlreadyPending`]), not an error.
    ///
    /// # Errors
    ///
    /// [`FlowError::Unresolvable`] when `status` offers no interactive path;
    /// [`FlowError::LaunchFailed`] when the host cannot deliver the
    /// interactive request. In both cases nothing is left pending.
    pub fn try_resolve(
        &mut self,
        status: &OutcomeStatus,
        kind: OperationKind,
    ) -> Result<ResolveDisposition, FlowError> {
        if let Some(pending) = self.pending {
            warn!(pending = %pending.kind, requested = %kind, "already resolving, ignoring");
            return Ok(ResolveDisposition::AlreadyPending);
        }

        if !status.has_resolution {
            return Err(FlowError::Unresolvable);
        }

        debug!(%status, %kind, "launching interactive resolution");
        self.host
            .launch(status, kind)
            .map_err(|err| FlowError::LaunchFailed { reason: err.reason })?;
        self.pending = Some(PendingResolution { kind });
        Ok(ResolveDisposition::Launched)
    }

    /// Clears and returns the pending resolution, whatever its outcome was.
    ///
    /// Called first on every delivered outcome (success, cancellation or
    /// launch-level failure) so a failed resolution can never leave the
    /// coordinator stuck "resolving".
    pub fn complete(&mut self) -> Option<PendingResolution> {
        self.pending.take()
    }

    /// Whether an interactive resolution is currently pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The kind of the pending resolution, if any.
    #[must_use]
    pub fn pending_kind(&self) -> Option<OperationKind> {
        self.pending.map(|pending| pending.kind)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{LaunchError, StatusCode};

    /// Records launch requests; optionally refuses them.
    struct RecordingHost {
        launches: Mutex<Vec<OperationKind>>,
        refuse: bool,
    }

    impl RecordingHost {
        fn new(refuse: bool) -> Arc<Self> {
            Arc::new(Self {
                launches: Mutex::new(Vec::new()),
                refuse,
            })
        }

        fn launched(&self) -> Vec<OperationKind> {
            self.launches.lock().unwrap().clone()
        }
    }

    impl ResolutionHost for RecordingHost {
        fn launch(
            &self,
            _status: &OutcomeStatus,
            kind: OperationKind,
        ) -> Result<(), LaunchError> {
            if self.refuse {
                return Err(LaunchError::new("host torn down"));
            }
            self.launches.lock().unwrap().push(kind);
            Ok(())
        }
    }

    fn resolvable() -> OutcomeStatus {
        OutcomeStatus::needs_resolution(StatusCode::ResolutionRequired)
    }

    #[test]
    fn test_launch_sets_pending() {
        let host = RecordingHost::new(false);
        let mut coordinator = ResolutionCoordinator::new(host.clone());

        let disposition = coordinator
            .try_resolve(&resolvable(), OperationKind::ResolveRead)
            .unwrap();

        assert_eq!(disposition, ResolveDisposition::Launched);
        assert!(coordinator.is_pending());
        assert_eq!(coordinator.pending_kind(), Some(OperationKind::ResolveRead));
        assert_eq!(host.launched(), vec![OperationKind::ResolveRead]);
    }

    #[test]
    fn test_second_resolve_while_pending_is_a_no_op() {
        let host = RecordingHost::new(false);
        let mut coordinator = ResolutionCoordinator::new(host.clone());

        coordinator
            .try_resolve(&resolvable(), OperationKind::ResolveRead)
            .unwrap();
        let disposition = coordinator
            .try_resolve(&resolvable(), OperationKind::Save)
            .unwrap();

        assert_eq!(disposition, ResolveDisposition::AlreadyPending);
        // No second interactive launch, and the original tag survives.
        assert_eq!(host.launched(), vec![OperationKind::ResolveRead]);
        assert_eq!(coordinator.pending_kind(), Some(OperationKind::ResolveRead));
    }

    #[test]
    fn test_unresolvable_status_is_terminal_and_leaves_nothing_pending() {
        let host = RecordingHost::new(false);
        let mut coordinator = ResolutionCoordinator::new(host.clone());

        let err = coordinator
            .try_resolve(
                &OutcomeStatus::failure(StatusCode::Other(13)),
                OperationKind::ResolveRead,
            )
            .unwrap_err();

        assert_eq!(err, FlowError::Unresolvable);
        assert!(!coordinator.is_pending());
        assert!(host.launched().is_empty());
    }

    #[test]
    fn test_launch_failure_leaves_nothing_pending() {
        let host = RecordingHost::new(true);
        let mut coordinator = ResolutionCoordinator::new(host);

        let err = coordinator
            .try_resolve(&resolvable(), OperationKind::Save)
            .unwrap_err();

        assert!(matches!(err, FlowError::LaunchFailed { .. }));
        assert!(!coordinator.is_pending());
    }

    #[test]
    fn test_complete_clears_pending_unconditionally() {
        let host = RecordingHost::new(false);
        let mut coordinator = ResolutionCoordinator::new(host);

        coordinator
            .try_resolve(&resolvable(), OperationKind::ResolveHint)
            .unwrap();
        let pending = coordinator.complete();

        assert_eq!(
            pending,
            Some(PendingResolution {
                kind: OperationKind::ResolveHint
            })
        );
        assert!(!coordinator.is_pending());
        // Completing again is harmless.
        assert_eq!(coordinator.complete(), None);
    }
}
