//! The credential subject adopted by the flow and mirrored into the
//! preference store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A user's credential subject: who the credential is for, not the secret
/// itself (which is opaque to this crate).
///
/// Created when a credential is retrieved or entered; persisted in the
/// preference store as the offline fallback; cleared on delete.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Identity {
    /// The identifier the service keys the credential by, typically an email
    /// address.
    pub identifier: String,
    /// Human-readable display name. Hint credentials may not carry one.
    pub display_name: Option<String>,
}

impl Identity {
    /// Creates an identity with an identifier only.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: None,
        }
    }

    /// Creates an identity with an identifier and a display name.
    #[must_use]
    pub fn named(identifier: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: Some(display_name.into()),
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Identifiers are user data; keep them out of debug output that may
        // end up in logs.
        f.debug_struct("Identity")
            .field("identifier", &"<redacted>")
            .field("display_name", &self.display_name.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{name} <{}>", self.identifier),
            None => write!(f, "{}", self.identifier),
        }
    }
}
