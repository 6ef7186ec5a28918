//! Credential records as the flow sees them.

use serde::{Deserialize, Serialize};

use crate::Identity;

/// A credential record returned by the credential service or assembled for a
/// save request.
///
/// The secret itself never appears here; it travels separately as
/// [`secrecy::SecretString`] and only on the save path. A hint carries no
/// secret at all; it must not be offered for deletion or treated as a
/// confirmed sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Credential {
    /// The subject this credential belongs to.
    pub identity: Identity,
    /// Whether this record is an identifier-only suggestion.
    pub is_hint: bool,
}

impl Credential {
    /// Creates a confirmed (non-hint) credential record.
    #[must_use]
    pub const fn confirmed(identity: Identity) -> Self {
        Self {
            identity,
            is_hint: false,
        }
    }

    /// Creates a hint record: an identifier-only suggestion without a secret.
    #[must_use]
    pub const fn hint(identity: Identity) -> Self {
        Self {
            identity,
            is_hint: true,
        }
    }
}
