//! The credential flow controller.
//!
//! Orchestrates the whole retrieve/save/delete lifecycle: issues service
//! requests, classifies their outcomes, hands unresolved outcomes to the
//! [`ResolutionCoordinator`], auto-saves accepted hints, and falls back to
//! the preference store when the service is unreachable. The UI collaborator
//! observes the flow through [`FlowSnapshot`] and the [`FlowEvent`] stream
//! and feeds interactive results back in through
//! [`CredentialFlow::on_resolution_complete`].

use std::sync::Arc;

use credkit_store::PreferenceStore;
use secrecy::SecretString;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, warn};

use crate::{
    defaults, Credential, CredentialRequest, CredentialService, FlowError, FlowEvent,
    FlowResult, FlowSnapshot, FlowState, Identity, OperationKind, OutcomeStatus,
    ResolutionCoordinator, ResolutionHost, ResolutionOutcome, ResolveDisposition,
    StatusCode,
};

/// Client-side credential retrieval/save/delete flow.
///
/// One outstanding service request at a time: every operation takes
/// `&mut self` and runs to its outcome before another can start. Interactive
/// resolutions are the exception: they outlive the operation that launched
/// them, and their results re-enter through
/// [`on_resolution_complete`](Self::on_resolution_complete), correlated by
/// [`OperationKind`].
pub struct CredentialFlow {
    service: Arc<dyn CredentialService>,
    cache: Arc<dyn PreferenceStore>,
    coordinator: ResolutionCoordinator,
    state: FlowState,
    identity: Option<Identity>,
    current: Option<Credential>,
    progress: bool,
    retry_visible: bool,
    events: UnboundedSender<FlowEvent>,
}

impl CredentialFlow {
    /// Creates a flow over the given service, host and preference store.
    ///
    /// Returns the flow and the receiving end of its event stream.
    #[must_use]
    pub fn new(
        service: Arc<dyn CredentialService>,
        host: Arc<dyn ResolutionHost>,
        cache: Arc<dyn PreferenceStore>,
    ) -> (Self, UnboundedReceiver<FlowEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                service,
                cache,
                coordinator: ResolutionCoordinator::new(host),
                state: FlowState::Idle,
                identity: None,
                current: None,
                progress: false,
                retry_visible: false,
                events,
            },
            receiver,
        )
    }

    /// Requests the user's stored password credentials and classifies the
    /// outcome.
    ///
    /// With `auto_resolve_hints` false, a hint-only outcome is silently
    /// dropped instead of prompting, which is appropriate for passive
    /// invocations at startup. The call is also a no-op while an interactive
    /// resolution is pending, so re-entry cannot stack prompts.
    ///
    /// # Errors
    ///
    /// Returns the terminal [`FlowError`] when the outcome can be neither
    /// completed nor resolved; the same error is reported on the event
    /// stream.
    pub async fn request_credentials(&mut self, auto_resolve_hints: bool) -> FlowResult<()> {
        if self.coordinator.is_pending() {
            debug!("request skipped, resolution in progress");
            return Ok(());
        }

        self.state = FlowState::Requesting;
        self.progress = true;

        let request = CredentialRequest::password_login();
        let outcome = self.service.request(&request).await;
        self.progress = false;

        match outcome {
            Ok(credential) => {
                self.process_retrieved(credential.identity, credential.is_hint)
                    .await
            }
            Err(status) => match status.code {
                StatusCode::SignInRequired if !auto_resolve_hints => {
                    debug!("ignoring hint outcome");
                    self.state = FlowState::Idle;
                    Ok(())
                }
                StatusCode::SignInRequired => {
                    self.delegate(&status, OperationKind::ResolveHint)
                }
                StatusCode::ResolutionRequired => {
                    self.delegate(&status, OperationKind::ResolveRead)
                }
                StatusCode::NetworkError => self.adopt_cached_or_fail(),
                code => self.fail(FlowError::UnexpectedStatus { code }),
            },
        }
    }

    /// Persists `identity` to the preference store and saves a credential
    /// for it with the service.
    ///
    /// Called by the embedder after credential entry, and internally with
    /// the placeholder secret when a hint is accepted.
    ///
    /// # Errors
    ///
    /// Returns the terminal [`FlowError`] when the save can be neither
    /// completed nor resolved.
    pub async fn save_credential(
        &mut self,
        identity: Identity,
        secret: SecretString,
    ) -> FlowResult<()> {
        self.persist_identity(&identity);

        let credential = Credential::confirmed(identity);
        self.state = FlowState::Requesting;
        self.progress = true;

        let outcome = self.service.save(&credential, &secret).await;
        match outcome {
            Ok(()) => {
                self.progress = false;
                self.state = FlowState::Authenticated;
                self.emit(FlowEvent::CredentialSaved);
                Ok(())
            }
            // Progress stays shown while the save resolution is pending;
            // `delegate` clears it if nothing can be launched.
            Err(status) => self.delegate(&status, OperationKind::Save),
        }
    }

    /// Deletes the current confirmed credential from the service.
    ///
    /// # Errors
    ///
    /// [`FlowError::NoCredentialToDelete`] without any service contact when
    /// no confirmed credential is held (hints are never deletable);
    /// [`FlowError::UnexpectedStatus`] when the service refuses; deletes
    /// have no interactive resolution path.
    pub async fn delete_credential(&mut self) -> FlowResult<()> {
        let Some(credential) = self.current.clone() else {
            warn!("no credential to delete");
            let err = FlowError::NoCredentialToDelete;
            self.emit(FlowEvent::Failure(err.clone()));
            return Err(err);
        };

        self.state = FlowState::Requesting;
        self.progress = true;

        let outcome = self.service.delete(&credential).await;
        self.progress = false;

        match outcome {
            Ok(()) => {
                if let Err(err) = self.cache.clear_all() {
                    warn!(%err, "failed to clear preference store");
                }
                self.identity = None;
                self.current = None;
                self.state = FlowState::Idle;
                self.emit(FlowEvent::CredentialDeleted);
                Ok(())
            }
            Err(status) => self.fail(FlowError::UnexpectedStatus { code: status.code }),
        }
    }

    /// Delivers the out-of-band result of an interactive resolution.
    ///
    /// The pending record is cleared before anything else, whatever the
    /// outcome, since a canceled or failed resolution must not leave the flow
    /// stuck "resolving". A delivery with no matching pending record is
    /// logged and still processed.
    ///
    /// # Errors
    ///
    /// Returns the terminal [`FlowError`] when the resolution was rejected
    /// or its follow-up save fails.
    pub async fn on_resolution_complete(
        &mut self,
        kind: OperationKind,
        outcome: ResolutionOutcome,
    ) -> FlowResult<()> {
        self.progress = false;
        match self.coordinator.complete() {
            Some(pending) if pending.kind == kind => {}
            Some(pending) => warn!(
                expected = %pending.kind,
                delivered = %kind,
                "resolution outcome kind mismatch"
            ),
            None => warn!(%kind, "resolution outcome with nothing pending"),
        }

        match kind {
            OperationKind::Save => match outcome {
                ResolutionOutcome::Confirmed => {
                    self.state = FlowState::Authenticated;
                    self.emit(FlowEvent::CredentialSaved);
                    Ok(())
                }
                ResolutionOutcome::Retrieved(_) | ResolutionOutcome::Canceled => {
                    self.fail(FlowError::ResolutionRejected { kind })
                }
            },
            OperationKind::ResolveHint | OperationKind::ResolveRead => match outcome {
                ResolutionOutcome::Retrieved(identity) => {
                    let is_hint = kind == OperationKind::ResolveHint;
                    self.process_retrieved(identity, is_hint).await
                }
                ResolutionOutcome::Confirmed | ResolutionOutcome::Canceled => {
                    self.fail(FlowError::ResolutionRejected { kind })
                }
            },
        }
    }

    /// Abandons any pending resolution and returns the flow to idle.
    ///
    /// Host teardown policy: an outcome arriving after a reset is handled as
    /// a spurious delivery by
    /// [`on_resolution_complete`](Self::on_resolution_complete).
    pub fn reset(&mut self) {
        if let Some(pending) = self.coordinator.complete() {
            warn!(kind = %pending.kind, "abandoning pending resolution on reset");
        }
        self.state = FlowState::Idle;
        self.identity = None;
        self.current = None;
        self.progress = false;
        self.retry_visible = false;
    }

    /// A point-in-time copy of the observable state surface.
    #[must_use]
    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            state: self.state,
            identity: self.identity.clone(),
            progress: self.progress,
            retry_visible: self.retry_visible,
        }
    }

    /// Current state machine position.
    #[must_use]
    pub const fn state(&self) -> FlowState {
        self.state
    }

    /// The adopted identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The current confirmed credential, if any. Hints never appear here.
    #[must_use]
    pub const fn current_credential(&self) -> Option<&Credential> {
        self.current.as_ref()
    }

    /// Whether a progress indicator should be shown.
    #[must_use]
    pub const fn progress_visible(&self) -> bool {
        self.progress
    }

    /// Whether the manual retry affordance should be shown.
    #[must_use]
    pub const fn retry_visible(&self) -> bool {
        self.retry_visible
    }

    /// The kind of the pending interactive resolution, if any.
    #[must_use]
    pub fn pending_resolution(&self) -> Option<OperationKind> {
        self.coordinator.pending_kind()
    }

    /// Adopts a retrieved credential subject.
    async fn process_retrieved(
        &mut self,
        identity: Identity,
        is_hint: bool,
    ) -> FlowResult<()> {
        debug!(is_hint, "credential retrieved");
        self.identity = Some(identity.clone());

        if is_hint {
            self.emit(FlowEvent::HintRetrieved(identity.clone()));
            // An accepted hint is persisted right away so the next start can
            // sign in silently. See `defaults::placeholder_secret`.
            self.save_credential(identity, defaults::placeholder_secret())
                .await
        } else {
            self.retry_visible = false;
            self.current = Some(Credential::confirmed(identity.clone()));
            self.state = FlowState::Authenticated;
            self.emit(FlowEvent::CredentialRetrieved(identity));
            Ok(())
        }
    }

    /// Hands a non-successful status to the coordinator, tagged with `kind`.
    fn delegate(&mut self, status: &OutcomeStatus, kind: OperationKind) -> FlowResult<()> {
        match self.coordinator.try_resolve(status, kind) {
            Ok(ResolveDisposition::Launched) => {
                self.state = FlowState::AwaitingResolution;
                Ok(())
            }
            Ok(ResolveDisposition::AlreadyPending) => Ok(()),
            Err(err) => {
                self.progress = false;
                // The single fallback rule: any terminal network failure
                // consults the cache, wherever it was classified.
                if status.code == StatusCode::NetworkError {
                    return self.adopt_cached_or_fail();
                }
                self.fail(err)
            }
        }
    }

    /// The network-failure fallback rule: adopt the cached identity or fail
    /// with the retry affordance visible.
    fn adopt_cached_or_fail(&mut self) -> FlowResult<()> {
        match self.cached_identity() {
            Some(identity) => {
                debug!("service unreachable, adopting cached identity");
                self.identity = Some(identity.clone());
                self.state = FlowState::Authenticated;
                self.emit(FlowEvent::SignedInFromCache(identity));
                Ok(())
            }
            None => {
                self.retry_visible = true;
                self.fail(FlowError::NetworkUnavailableNoCache)
            }
        }
    }

    /// Reads the cached identity; any store error counts as a cache miss.
    fn cached_identity(&self) -> Option<Identity> {
        let identifier = match self.cache.get(defaults::PREF_IDENTIFIER) {
            Ok(value) => value?,
            Err(err) => {
                warn!(%err, "preference store read failed, treating as cache miss");
                return None;
            }
        };
        let display_name = self
            .cache
            .get(defaults::PREF_DISPLAY_NAME)
            .unwrap_or_else(|err| {
                warn!(%err, "preference store read failed, dropping display name");
                None
            })
            .filter(|name| !name.is_empty());
        Some(Identity {
            identifier,
            display_name,
        })
    }

    /// Mirrors `identity` into the preference store, best effort: the store
    /// is an offline fallback, a write failure must not block sign-in.
    fn persist_identity(&self, identity: &Identity) {
        if let Err(err) = self.cache.put(defaults::PREF_IDENTIFIER, &identity.identifier) {
            warn!(%err, "failed to cache identifier");
            return;
        }
        // An empty value means no display name; overwrite so a stale name
        // from a previous subject cannot survive.
        let display_name = identity.display_name.as_deref().unwrap_or_default();
        if let Err(err) = self.cache.put(defaults::PREF_DISPLAY_NAME, display_name) {
            warn!(%err, "failed to cache display name");
        }
    }

    /// Records a terminal failure on the state surface and returns it.
    fn fail(&mut self, error: FlowError) -> FlowResult<()> {
        error!(%error, "terminal failure");
        self.state = FlowState::Failed;
        self.emit(FlowEvent::Failure(error.clone()));
        Err(error)
    }

    /// Emits an event; the receiver may be gone during teardown.
    fn emit(&self, event: FlowEvent) {
        if self.events.send(event).is_err() {
            debug!("event receiver dropped");
        }
    }
}
