//! Session persistence.
//!
//! Wraps the pure [`Session`] state machine with a serialize-after-
//! mutate hook: every `login`/`logout` writes the full state to
//! durable storage under the fixed [`STORAGE_KEY`] namespace, and a
//! new store rehydrates from that storage so a restart resumes the
//! prior session without re-authentication.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use savego::session::{STORAGE_KEY, Session, User};
use thiserror::Error;
use tracing::debug;

/// Errors from reading or writing persisted session state.
#[derive(Debug, Error)]
pub enum SessionStorageError {
    /// Filesystem failure.
    #[error("session storage io error")]
    Io(#[from] io::Error),

    /// The persisted state could not be (de)serialized.
    #[error("session serialization error")]
    Serde(#[from] serde_json::Error),
}

/// Durable storage backend for the serialized session.
pub trait SessionStorage {
    /// Load the persisted session, `None` when nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend fails or holds corrupt state.
    fn load(&self) -> Result<Option<Session>, SessionStorageError>;

    /// Persist the full session state.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be written.
    fn save(&self, session: &Session) -> Result<(), SessionStorageError>;
}

/// JSON-file storage: `<dir>/auth-storage.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage rooted at the given state directory.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// The file backing this storage.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Session>, SessionStorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, session: &Session) -> Result<(), SessionStorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;

        Ok(())
    }
}

/// The session container owned by the application root.
///
/// Mutations go through [`SessionStore::login`] and
/// [`SessionStore::logout`] only; each persists the new state before
/// returning. Reads go through [`SessionStore::session`].
#[derive(Debug)]
pub struct SessionStore<S: SessionStorage> {
    session: Session,
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Open the store, rehydrating any previously persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage backend fails.
    pub fn open(storage: S) -> Result<Self, SessionStorageError> {
        let session = storage.load()?.unwrap_or_default();

        if session.is_authenticated() {
            debug!("resumed persisted session");
        }

        Ok(Self { session, storage })
    }

    /// Set identity and token, then persist.
    ///
    /// # Errors
    ///
    /// Returns an error when persisting fails; the in-memory state is
    /// already updated either way.
    pub fn login(&mut self, user: User, token: String) -> Result<(), SessionStorageError> {
        self.session.login(user, token);
        self.storage.save(&self.session)
    }

    /// Clear identity and token, then persist the anonymous state.
    ///
    /// # Errors
    ///
    /// Returns an error when persisting fails; the in-memory state is
    /// already cleared either way.
    pub fn logout(&mut self) -> Result<(), SessionStorageError> {
        self.session.logout();
        self.storage.save(&self.session)
    }

    /// Current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use savego::session::Role;
    use testresult::TestResult;

    use super::*;

    fn customer() -> User {
        User {
            id: 1,
            email: "sam@example.com".to_string(),
            username: "sam".to_string(),
            first_name: None,
            last_name: None,
            role: Role::Customer,
        }
    }

    #[test]
    fn fresh_directory_yields_anonymous_session() -> TestResult {
        let dir = tempfile::tempdir()?;

        let store = SessionStore::open(JsonFileStorage::new(dir.path()))?;

        assert!(!store.session().is_authenticated());

        Ok(())
    }

    #[test]
    fn login_survives_a_simulated_reload() -> TestResult {
        let dir = tempfile::tempdir()?;

        let mut store = SessionStore::open(JsonFileStorage::new(dir.path()))?;
        store.login(customer(), "tok-9".to_string())?;

        // A second store over the same directory stands in for a
        // process restart.
        let reloaded = SessionStore::open(JsonFileStorage::new(dir.path()))?;

        assert!(reloaded.session().is_authenticated());
        assert_eq!(reloaded.session().bearer_token(), Some("tok-9"));
        assert_eq!(
            reloaded.session().user.as_ref().map(|user| user.id),
            Some(1)
        );

        Ok(())
    }

    #[test]
    fn logout_persists_the_anonymous_state() -> TestResult {
        let dir = tempfile::tempdir()?;

        let mut store = SessionStore::open(JsonFileStorage::new(dir.path()))?;
        store.login(customer(), "tok-9".to_string())?;
        store.logout()?;

        assert!(!store.session().is_authenticated());

        let reloaded = SessionStore::open(JsonFileStorage::new(dir.path()))?;

        assert!(!reloaded.session().is_authenticated());
        assert!(reloaded.session().user.is_none());
        assert!(reloaded.session().token.is_none());

        Ok(())
    }

    #[test]
    fn session_file_lives_under_the_fixed_key() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path());

        let mut store = SessionStore::open(storage.clone())?;
        store.login(customer(), "tok-9".to_string())?;

        assert_eq!(
            storage.path().file_name().and_then(|name| name.to_str()),
            Some("auth-storage.json")
        );
        assert!(storage.path().exists());

        Ok(())
    }

    #[test]
    fn corrupt_state_is_an_error_not_a_panic() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path());

        fs::write(storage.path(), "not json")?;

        let result = SessionStore::open(storage);

        assert!(matches!(
            result,
            Err(SessionStorageError::Serde(_))
        ));

        Ok(())
    }
}
