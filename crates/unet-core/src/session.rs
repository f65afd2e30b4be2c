// ── Session persistence ──
//
// A session is the bearer token plus the profile of the signed-in user.
// It survives restarts through a `SessionStore`; the file-backed store
// keeps the two halves under fixed names in one directory.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use unet_api::LoginResponse;

use crate::error::CoreError;

/// File name of the persisted bearer token.
pub const TOKEN_KEY: &str = "unet_token";
/// File name of the persisted user profile.
pub const USER_KEY: &str = "unet_user";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Login name as typed.
    pub username: String,
}

impl UserProfile {
    pub fn from_login(login: &LoginResponse, username: &str) -> Self {
        Self {
            name: login.display_name.clone(),
            role: login.role.clone(),
            permissions: login.permissions.clone(),
            username: username.to_owned(),
        }
    }

    /// Single upper-cased letter for avatar badges, `U` when the name is empty.
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map_or_else(|| "U".to_owned(), |c| c.to_uppercase().collect())
    }
}

/// Token and user, as stored.
#[derive(Debug)]
pub struct Session {
    pub token: SecretString,
    pub user: UserProfile,
}

/// Durable storage for the session.
pub trait SessionStore: Send + Sync {
    /// The stored session, if both token and user are present.
    fn load(&self) -> Result<Option<Session>, CoreError>;
    fn save(&self, session: &Session) -> Result<(), CoreError>;
    /// Remove the stored session. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), CoreError>;
}

// ── File store ───────────────────────────────────────────────────────

/// Session stored as two files, `unet_token` and `unet_user`, in one
/// directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_KEY)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_KEY)
    }
}

fn storage_error(path: &Path, err: &std::io::Error) -> CoreError {
    CoreError::Storage {
        message: format!("{}: {err}", path.display()),
    }
}

/// Read a file, mapping "not found" to `None`.
fn read_optional(path: &Path) -> Result<Option<String>, CoreError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(storage_error(path, &e)),
    }
}

fn remove_optional(path: &Path) -> Result<(), CoreError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(storage_error(path, &e)),
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| storage_error(path, &e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, CoreError> {
        let token_path = self.token_path();
        let user_path = self.user_path();

        let Some(token) = read_optional(&token_path)? else {
            return Ok(None);
        };
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        let Some(raw_user) = read_optional(&user_path)? else {
            return Ok(None);
        };

        match serde_json::from_str::<UserProfile>(&raw_user) {
            Ok(user) => {
                debug!(path = %self.dir.display(), user = %user.username, "session loaded");
                Ok(Some(Session {
                    token: SecretString::from(token.to_owned()),
                    user,
                }))
            }
            Err(e) => {
                warn!(path = %user_path.display(), error = %e, "ignoring unreadable stored user");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| storage_error(&self.dir, &e))?;

        let token_path = self.token_path();
        std::fs::write(&token_path, session.token.expose_secret())
            .map_err(|e| storage_error(&token_path, &e))?;
        restrict_permissions(&token_path)?;

        let user_path = self.user_path();
        let user = serde_json::to_string(&session.user)
            .map_err(|e| CoreError::Internal(format!("failed to encode user: {e}")))?;
        std::fs::write(&user_path, user).map_err(|e| storage_error(&user_path, &e))?;

        debug!(path = %self.dir.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        remove_optional(&self.token_path())?;
        remove_optional(&self.user_path())?;
        debug!(path = %self.dir.display(), "session cleared");
        Ok(())
    }
}

// ── Memory store ─────────────────────────────────────────────────────

/// Process-local store, for tests.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<(String, UserProfile)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a session.
    pub fn with_session(token: &str, user: UserProfile) -> Self {
        Self {
            slot: Mutex::new(Some((token.to_owned(), user))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl fmt::Debug for MemorySessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySessionStore")
            .field("empty", &self.is_empty())
            .finish()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, CoreError> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.as_ref().map(|(token, user)| Session {
            token: SecretString::from(token.clone()),
            user: user.clone(),
        }))
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some((
            session.token.expose_secret().to_owned(),
            session.user.clone(),
        ));
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
