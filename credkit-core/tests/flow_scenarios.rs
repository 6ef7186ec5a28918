//! End-to-end walks of the credential flow scenarios, service outcomes and
//! resolution deliveries scripted, observable surface asserted at each step.

mod common;

use std::sync::Arc;

use credkit_core::{
    defaults, Credential, CredentialFlow, FlowEvent, FlowState, Identity,
    OperationKind, OutcomeStatus, ResolutionOutcome, StatusCode,
};
use credkit_store::{FileStore, MemoryStore, PreferenceStore};
use tokio::sync::mpsc::UnboundedReceiver;

use common::{RecordingHost, ScriptedService};

fn drain(receiver: &mut UnboundedReceiver<FlowEvent>) -> Vec<FlowEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

/// Scenario A: a single stored credential signs in silently.
#[tokio::test]
async fn test_auto_sign_in() {
    let service = ScriptedService::new();
    let host = RecordingHost::new();
    service.on_request(Ok(Credential::confirmed(Identity::named("a@x.com", "A"))));

    let (mut flow, mut events) =
        CredentialFlow::new(service.clone(), host.clone(), Arc::new(MemoryStore::new()));
    flow.request_credentials(true).await.unwrap();

    let snapshot = flow.snapshot();
    assert_eq!(snapshot.state, FlowState::Authenticated);
    assert!(!snapshot.retry_visible);
    assert!(!snapshot.progress);
    assert_eq!(snapshot.identity, Some(Identity::named("a@x.com", "A")));
    // Delete is possible now: a confirmed credential is held.
    assert!(flow.current_credential().is_some());
    assert!(host.launched().is_empty());
    assert_eq!(
        drain(&mut events),
        vec![FlowEvent::CredentialRetrieved(Identity::named("a@x.com", "A"))]
    );
}

/// Scenario B: hint retrieved, auto-saved with the placeholder secret,
/// signed in.
#[tokio::test]
async fn test_hint_accept_and_auto_save() {
    let service = ScriptedService::new();
    let host = RecordingHost::new();
    service.on_request(Err(OutcomeStatus::needs_resolution(
        StatusCode::SignInRequired,
    )));
    service.on_save(Ok(()));
    let cache = Arc::new(MemoryStore::new());

    let (mut flow, mut events) =
        CredentialFlow::new(service.clone(), host.clone(), cache.clone());
    flow.request_credentials(true).await.unwrap();

    assert_eq!(flow.state(), FlowState::AwaitingResolution);
    assert_eq!(host.launched_kinds(), vec![OperationKind::ResolveHint]);

    flow.on_resolution_complete(
        OperationKind::ResolveHint,
        ResolutionOutcome::Retrieved(Identity::new("b@x.com")),
    )
    .await
    .unwrap();

    assert_eq!(flow.state(), FlowState::Authenticated);
    assert_eq!(service.save_calls(), 1);
    assert_eq!(service.saved_secrets(), vec!["password".to_owned()]);
    // A hint is not a confirmed credential; nothing is deletable yet, but
    // the identity has been mirrored into the offline cache.
    assert!(flow.current_credential().is_none());
    assert_eq!(
        cache.get(defaults::PREF_IDENTIFIER).unwrap().as_deref(),
        Some("b@x.com")
    );
    assert_eq!(
        drain(&mut events),
        vec![
            FlowEvent::HintRetrieved(Identity::new("b@x.com")),
            FlowEvent::CredentialSaved,
        ]
    );
}

/// Scenario C: offline with an empty cache fails with the retry affordance;
/// an explicit retry issues a fresh request.
#[tokio::test]
async fn test_offline_then_manual_retry() {
    let service = ScriptedService::new();
    let host = RecordingHost::new();
    service.on_request(Err(OutcomeStatus::failure(StatusCode::NetworkError)));
    service.on_request(Ok(Credential::confirmed(Identity::named("a@x.com", "A"))));

    let (mut flow, mut events) =
        CredentialFlow::new(service.clone(), host.clone(), Arc::new(MemoryStore::new()));

    flow.request_credentials(true).await.unwrap_err();
    assert_eq!(flow.state(), FlowState::Failed);
    assert!(flow.retry_visible());

    // The user clicks retry.
    flow.request_credentials(true).await.unwrap();
    assert_eq!(service.request_calls(), 2);
    assert_eq!(flow.state(), FlowState::Authenticated);
    assert!(!flow.retry_visible());
    assert_eq!(
        drain(&mut events),
        vec![
            FlowEvent::Failure(credkit_core::FlowError::NetworkUnavailableNoCache),
            FlowEvent::CredentialRetrieved(Identity::named("a@x.com", "A")),
        ]
    );
}

/// Offline with a warm cache signs in without any further service contact.
#[tokio::test]
async fn test_offline_with_cached_identity() {
    let service = ScriptedService::new();
    let host = RecordingHost::new();
    service.on_request(Err(OutcomeStatus::failure(StatusCode::NetworkError)));

    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(FileStore::new(dir.path().join("prefs.cbor")));
    cache.put(defaults::PREF_IDENTIFIER, "a@x.com").unwrap();
    cache.put(defaults::PREF_DISPLAY_NAME, "A").unwrap();

    let (mut flow, mut events) = CredentialFlow::new(service.clone(), host, cache);
    flow.request_credentials(true).await.unwrap();

    assert_eq!(flow.state(), FlowState::Authenticated);
    assert_eq!(flow.identity(), Some(&Identity::named("a@x.com", "A")));
    assert_eq!(service.request_calls(), 1);
    assert_eq!(
        drain(&mut events),
        vec![FlowEvent::SignedInFromCache(Identity::named("a@x.com", "A"))]
    );
}

/// Scenario D: delete the loaded credential, clearing cache and identity.
#[tokio::test]
async fn test_delete_loaded_credential() {
    let service = ScriptedService::new();
    let host = RecordingHost::new();
    service.on_request(Ok(Credential::confirmed(Identity::named("a@x.com", "A"))));
    service.on_delete(Ok(()));

    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(FileStore::new(dir.path().join("prefs.cbor")));
    cache.put(defaults::PREF_IDENTIFIER, "a@x.com").unwrap();

    let (mut flow, mut events) =
        CredentialFlow::new(service.clone(), host, cache.clone());
    flow.request_credentials(true).await.unwrap();
    flow.delete_credential().await.unwrap();

    assert_eq!(flow.state(), FlowState::Idle);
    assert!(flow.identity().is_none());
    assert!(flow.current_credential().is_none());
    assert!(!cache.exists(defaults::PREF_IDENTIFIER).unwrap());
    assert_eq!(
        drain(&mut events),
        vec![
            FlowEvent::CredentialRetrieved(Identity::named("a@x.com", "A")),
            FlowEvent::CredentialDeleted,
        ]
    );
}

/// A picker over multiple stored credentials resolves to a confirmed
/// sign-in.
#[tokio::test]
async fn test_multiple_credentials_resolve_through_picker() {
    let service = ScriptedService::new();
    let host = RecordingHost::new();
    service.on_request(Err(OutcomeStatus::needs_resolution(
        StatusCode::ResolutionRequired,
    )));

    let (mut flow, mut events) =
        CredentialFlow::new(service, host.clone(), Arc::new(MemoryStore::new()));
    flow.request_credentials(true).await.unwrap();

    assert_eq!(host.launched_kinds(), vec![OperationKind::ResolveRead]);
    let (status, _) = host.launched()[0];
    assert_eq!(status.code, StatusCode::ResolutionRequired);

    flow.on_resolution_complete(
        OperationKind::ResolveRead,
        ResolutionOutcome::Retrieved(Identity::named("b@x.com", "B")),
    )
    .await
    .unwrap();

    assert_eq!(flow.state(), FlowState::Authenticated);
    // Picked credentials are confirmed, not hints: deletable.
    assert!(flow.current_credential().is_some());
    assert_eq!(
        drain(&mut events),
        vec![FlowEvent::CredentialRetrieved(Identity::named("b@x.com", "B"))]
    );
}
