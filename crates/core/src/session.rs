//! Session Store
//!
//! The owner of the authenticated identity and bearer token. The state
//! machine here is pure; the application layer persists the serialized
//! [`Session`] under [`STORAGE_KEY`] on every mutation so a reload
//! resumes the prior session without re-authentication.

use serde::{Deserialize, Serialize};

/// Fixed namespace key under which the session is persisted.
pub const STORAGE_KEY: &str = "auth-storage";

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regular shopper.
    Customer,

    /// A back-office administrator.
    Admin,
}

/// Authenticated identity as returned by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: u64,

    /// Email address.
    pub email: String,

    /// Display username.
    pub username: String,

    /// Optional given name.
    pub first_name: Option<String>,

    /// Optional family name.
    pub last_name: Option<String>,

    /// Account role.
    pub role: Role,
}

/// Authentication state: identity plus opaque bearer token.
///
/// Both fields are set and cleared together; `is_authenticated` holds
/// exactly when both are present. Tokens are trusted as received from
/// a successful authentication exchange and never inspected locally;
/// expiry only surfaces when a protected call fails, at which point
/// the caller logs out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Authenticated identity, if any.
    pub user: Option<User>,

    /// Opaque bearer credential, if any.
    pub token: Option<String>,
}

impl Session {
    /// Create an anonymous session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically set identity and token.
    pub fn login(&mut self, user: User, token: String) {
        self.user = Some(user);
        self.token = Some(token);
    }

    /// Atomically clear identity and token.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
    }

    /// True iff both identity and token are present.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    /// The bearer credential for `Authorization` headers, if present.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
