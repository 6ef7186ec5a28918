//! Common test doubles shared across integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use credkit_core::{
    Credential, CredentialRequest, CredentialService, LaunchError, OperationKind,
    OutcomeStatus, ResolutionHost,
};
use secrecy::{ExposeSecret, SecretString};

/// A credential service whose outcomes are drained from per-operation
/// queues, in script order.
#[derive(Default)]
pub struct ScriptedService {
    requests: Mutex<VecDeque<Result<Credential, OutcomeStatus>>>,
    saves: Mutex<VecDeque<Result<(), OutcomeStatus>>>,
    deletes: Mutex<VecDeque<Result<(), OutcomeStatus>>>,
    request_calls: AtomicUsize,
    save_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    saved_secrets: Mutex<Vec<String>>,
}

impl ScriptedService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_request(&self, outcome: Result<Credential, OutcomeStatus>) {
        self.requests.lock().unwrap().push_back(outcome);
    }

    pub fn on_save(&self, outcome: Result<(), OutcomeStatus>) {
        self.saves.lock().unwrap().push_back(outcome);
    }

    pub fn on_delete(&self, outcome: Result<(), OutcomeStatus>) {
        self.deletes.lock().unwrap().push_back(outcome);
    }

    pub fn request_calls(&self) -> usize {
        self.request_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn saved_secrets(&self) -> Vec<String> {
        self.saved_secrets.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialService for ScriptedService {
    async fn request(
        &self,
        _request: &CredentialRequest,
    ) -> Result<Credential, OutcomeStatus> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted request outcome")
    }

    async fn save(
        &self,
        _credential: &Credential,
        secret: &SecretString,
    ) -> Result<(), OutcomeStatus> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.saved_secrets
            .lock()
            .unwrap()
            .push(secret.expose_secret().to_owned());
        self.saves
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted save outcome")
    }

    async fn delete(&self, _credential: &Credential) -> Result<(), OutcomeStatus> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.deletes
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted delete outcome")
    }
}

/// A resolution host that records launches instead of showing UI.
#[derive(Default)]
pub struct RecordingHost {
    launches: Mutex<Vec<(OutcomeStatus, OperationKind)>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn launched(&self) -> Vec<(OutcomeStatus, OperationKind)> {
        self.launches.lock().unwrap().clone()
    }

    pub fn launched_kinds(&self) -> Vec<OperationKind> {
        self.launches
            .lock()
            .unwrap()
            .iter()
            .map(|(_, kind)| *kind)
            .collect()
    }
}

impl ResolutionHost for RecordingHost {
    fn launch(
        &self,
        status: &OutcomeStatus,
        kind: OperationKind,
    ) -> Result<(), LaunchError> {
        self.launches.lock().unwrap().push((*status, kind));
        Ok(())
    }
}
