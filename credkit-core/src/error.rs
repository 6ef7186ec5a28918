//! Terminal failure taxonomy for the credential flow.

use thiserror::Error;

use crate::{OperationKind, StatusCode};

/// Terminal failures of the credential flow.
///
/// Every variant is reported to the observable state surface as a
/// [`crate::FlowEvent::Failure`] and none triggers an automatic retry; retry
/// is always a new explicit [`crate::CredentialFlow::request_credentials`]
/// call. The only automatic recovery path is the network-error cache
/// fallback, which does not surface an error at all when the cache is
/// populated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The service outcome offers no interactive resolution path.
    #[error("unresolvable")]
    Unresolvable,
    /// The host could not start the interactive resolution.
    #[error("launch_failed: {reason}")]
    LaunchFailed {
        /// Host-reported reason the launch did not start.
        reason: String,
    },
    /// The interactive resolution was declined or canceled by the user.
    #[error("resolution_rejected: {kind}")]
    ResolutionRejected {
        /// The operation the rejected resolution was launched for.
        kind: OperationKind,
    },
    /// The service is unreachable and the preference store holds no fallback
    /// identity.
    #[error("network_unavailable_no_cache")]
    NetworkUnavailableNoCache,
    /// The service reported a status code the flow does not recognize.
    #[error("unexpected_status: {code}")]
    UnexpectedStatus {
        /// The unrecognized status code.
        code: StatusCode,
    },
    /// Delete was requested while no confirmed credential is held.
    #[error("no_credential_to_delete")]
    NoCredentialToDelete,
}

/// Result type for credential flow operations.
pub type FlowResult<T> = Result<T, FlowError>;
