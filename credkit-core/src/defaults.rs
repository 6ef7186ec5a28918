//! Well-known preference keys and fixed flow constants.

use secrecy::SecretString;

/// Preference store key for the cached identifier.
pub const PREF_IDENTIFIER: &str = "identifier";

/// Preference store key for the cached display name.
pub const PREF_DISPLAY_NAME: &str = "display_name";

/// The fixed secret used when persisting an accepted hint.
///
/// An accepted hint carries no secret of its own, yet the flow immediately
/// saves it so the next start can sign in silently. A production embedder
/// should collect real credential entry and call
/// [`crate::CredentialFlow::save_credential`] with it instead; this constant
/// exists to keep the hint path self-contained.
#[must_use]
pub fn placeholder_secret() -> SecretString {
    SecretString::from("password")
}
