//! The observable state surface exposed to the UI collaborator.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{FlowError, Identity};

/// The credential flow's position in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    /// Nothing in flight and nobody signed in.
    Idle,
    /// A service request is in flight.
    Requesting,
    /// An interactive resolution has been launched and its outcome has not
    /// arrived yet.
    AwaitingResolution,
    /// A confirmed identity has been adopted.
    Authenticated,
    /// A terminal failure was reported; waiting for an explicit retry.
    Failed,
}

/// Terminal notifications emitted by the flow.
///
/// Structured counterparts of what a UI would toast; the UI collaborator
/// decides presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// A confirmed credential was retrieved and adopted.
    CredentialRetrieved(Identity),
    /// A hint was retrieved; a save with its identity follows immediately.
    HintRetrieved(Identity),
    /// A credential save was confirmed by the service or the user.
    CredentialSaved,
    /// The current credential was deleted.
    CredentialDeleted,
    /// The service was unreachable and the cached identity was adopted
    /// instead.
    SignedInFromCache(Identity),
    /// A terminal failure; see [`FlowError`] for the taxonomy.
    Failure(FlowError),
}

/// A point-in-time copy of everything the UI renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSnapshot {
    /// Current state machine position.
    pub state: FlowState,
    /// The adopted identity, if any.
    pub identity: Option<Identity>,
    /// Whether a progress indicator should be shown.
    pub progress: bool,
    /// Whether the manual retry affordance should be shown.
    pub retry_visible: bool,
}
