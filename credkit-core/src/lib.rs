//! Core resolution state machine for CredKit.
//!
//! CredKit is a client-side credential retrieval/save/delete flow against an
//! external identity-credential service. The service can return a stored
//! username/password pair outright, offer a "hint" (identifier-only
//! suggestion), or require a user-facing disambiguation step whose result
//! arrives later and must be correlated back to the operation that asked for
//! it.
//!
//! The interesting part lives in [`ResolutionCoordinator`] (at most one
//! interactive resolution in flight, correlated by [`OperationKind`]) and
//! [`CredentialFlow`] (outcome classification, hint auto-save, offline cache
//! fallback). UI concerns such as screens, buttons and toasts sit behind
//! the [`ResolutionHost`] trait and the [`FlowEvent`] stream.
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

mod credential;
pub use credential::*;

pub mod defaults;

mod error;
pub use error::*;

mod events;
pub use events::*;

mod flow;
pub use flow::*;

mod host;
pub use host::*;

mod identity;
pub use identity::*;

mod resolution;
pub use resolution::*;

mod service;
pub use service::*;

mod status;
pub use status::*;
