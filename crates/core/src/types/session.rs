//! Session record persisted by the login flow.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Storage key under which the login flow writes the session record.
///
/// The spelling matches what the storefront's login page writes.
pub const SESSION_KEY: &str = "codebuger:userData";

/// Stored identity of the logged-in user.
///
/// Written at login and removed at logout by collaborators outside this
/// crate. Access decisions only ever read it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// User identifier (the login email in practice).
    #[serde(alias = "email")]
    pub identity: String,
    /// Whether the user may reach admin views.
    #[serde(rename = "admin", default)]
    pub is_admin: bool,
    /// API token issued at login, sent as a bearer credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SessionRecord {
    /// Create a session record without a token.
    #[must_use]
    pub fn new(identity: impl Into<String>, is_admin: bool) -> Self {
        Self {
            identity: identity.into(),
            is_admin,
            token: None,
        }
    }

    /// Attach an API token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Decode a record from its stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object with an identity.
    pub fn from_stored(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }

    /// Encode the record into its stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_stored(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRecord")
            .field("identity", &self.identity)
            .field("is_admin", &self.is_admin)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
