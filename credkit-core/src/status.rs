//! Outcome status codes reported by the credential service.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Status code attached to a credential service outcome.
///
/// Mirrors the coarse status surface of credential backends: an outcome is
/// either successful, one of three recognized failure classes, or an
/// unrecognized raw code carried through for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    /// The operation completed.
    Ok,
    /// No confirmed credential is stored; at best a hint can be offered.
    SignInRequired,
    /// The outcome needs user disambiguation, typically a credential picker
    /// over multiple stored credentials.
    ResolutionRequired,
    /// The service could not be reached.
    NetworkError,
    /// Any other service code, carried raw.
    #[strum(to_string = "other_{0}")]
    Other(u16),
}

/// The status of an asynchronous credential service outcome.
///
/// `has_resolution` signals that the service can complete the operation
/// through an out-of-band interactive step (picker, consent dialog) if the
/// caller launches one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OutcomeStatus {
    /// The service's status code for the outcome.
    pub code: StatusCode,
    /// Whether an interactive resolution path is available.
    pub has_resolution: bool,
}

impl OutcomeStatus {
    /// A successful outcome.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            code: StatusCode::Ok,
            has_resolution: false,
        }
    }

    /// A failed outcome with no interactive resolution path.
    #[must_use]
    pub const fn failure(code: StatusCode) -> Self {
        Self {
            code,
            has_resolution: false,
        }
    }

    /// A failed outcome the service can resolve interactively.
    #[must_use]
    pub const fn needs_resolution(code: StatusCode) -> Self {
        Self {
            code,
            has_resolution: true,
        }
    }

    /// Whether this outcome completed without any failure.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.code, StatusCode::Ok)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_resolution {
            write!(f, "{} (resolvable)", self.code)
        } else {
            write!(f, "{}", self.code)
        }
    }
}
