//! In-process doubles standing in for the platform: a credential service
//! with queued outcomes and a host that acknowledges every resolution
//! launch.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use credkit_core::{
    Credential, CredentialRequest, CredentialService, LaunchError, OperationKind,
    OutcomeStatus, ResolutionHost,
};
use secrecy::SecretString;

/// A credential service whose outcomes are drained from per-operation
/// queues, in script order.
#[derive(Default)]
pub struct ScriptedService {
    requests: Mutex<VecDeque<Result<Credential, OutcomeStatus>>>,
    saves: Mutex<VecDeque<Result<(), OutcomeStatus>>>,
    deletes: Mutex<VecDeque<Result<(), OutcomeStatus>>>,
}

impl ScriptedService {
    /// Creates a service with empty scripts.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues the outcome of the next read request.
    pub fn on_request(&self, outcome: Result<Credential, OutcomeStatus>) {
        Self::lock(&self.requests).push_back(outcome);
    }

    /// Queues the outcome of the next save.
    pub fn on_save(&self, outcome: Result<(), OutcomeStatus>) {
        Self::lock(&self.saves).push_back(outcome);
    }

    /// Queues the outcome of the next delete.
    pub fn on_delete(&self, outcome: Result<(), OutcomeStatus>) {
        Self::lock(&self.deletes).push_back(outcome);
    }

    fn lock<T>(
        queue: &Mutex<VecDeque<Result<T, OutcomeStatus>>>,
    ) -> std::sync::MutexGuard<'_, VecDeque<Result<T, OutcomeStatus>>> {
        queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T, OutcomeStatus>>>) -> Result<T, OutcomeStatus> {
        // An unscripted call falls through as an unrecognized status rather
        // than panicking mid-demo.
        Self::lock(queue)
            .pop_front()
            .unwrap_or(Err(OutcomeStatus::failure(
                credkit_core::StatusCode::Other(0),
            )))
    }
}

#[async_trait]
impl CredentialService for ScriptedService {
    async fn request(
        &self,
        _request: &CredentialRequest,
    ) -> Result<Credential, OutcomeStatus> {
        Self::next(&self.requests)
    }

    async fn save(
        &self,
        _credential: &Credential,
        _secret: &SecretString,
    ) -> Result<(), OutcomeStatus> {
        Self::next(&self.saves)
    }

    async fn delete(&self, _credential: &Credential) -> Result<(), OutcomeStatus> {
        Self::next(&self.deletes)
    }
}

/// A host that acknowledges every launch; the demo driver plays the user
/// and delivers the outcome afterwards.
pub struct PromptlessHost;

impl ResolutionHost for PromptlessHost {
    fn launch(
        &self,
        status: &OutcomeStatus,
        kind: OperationKind,
    ) -> Result<(), LaunchError> {
        println!("» interactive resolution requested: {kind} ({status})");
        Ok(())
    }
}
