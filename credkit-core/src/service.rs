//! The external credential service seam.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::{Credential, OutcomeStatus};

/// Criteria for a credential read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CredentialRequest {
    /// Whether stored username/password credentials satisfy the request.
    pub supports_password_login: bool,
}

impl CredentialRequest {
    /// A request for all of the user's stored password credentials.
    #[must_use]
    pub const fn password_login() -> Self {
        Self {
            supports_password_login: true,
        }
    }
}

/// The external identity-credential service.
///
/// Consumed, never implemented, by this crate: production hosts adapt their
/// platform's credential API behind this trait, tests and the CLI install
/// scripted implementations. Each operation completes asynchronously with
/// either its payload or an [`OutcomeStatus`] describing why it could not
/// complete silently.
///
/// A read request resolves the service's stored credential set internally:
/// success means a single usable credential (auto sign-in), while several
/// matches surface as a `resolution_required` status for the picker.
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Requests a stored credential matching `request`.
    ///
    /// # Errors
    ///
    /// Returns the outcome status when no credential can be returned
    /// silently.
    async fn request(&self, request: &CredentialRequest)
        -> Result<Credential, OutcomeStatus>;

    /// Saves `credential` with its `secret` to the service.
    ///
    /// # Errors
    ///
    /// Returns the outcome status when the save does not complete silently.
    async fn save(
        &self,
        credential: &Credential,
        secret: &SecretString,
    ) -> Result<(), OutcomeStatus>;

    /// Deletes `credential` from the service.
    ///
    /// The service offers no interactive resolution for deletes; any failure
    /// is final.
    ///
    /// # Errors
    ///
    /// Returns the outcome status when the delete fails.
    async fn delete(&self, credential: &Credential) -> Result<(), OutcomeStatus>;
}
