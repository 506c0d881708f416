/// Admin session persistence
///
/// The one piece of process-wide state: the bearer token (plus the
/// user it belongs to), kept in a JSON file in the user's data
/// directory:
/// - Linux: ~/.local/share/portfolio-studio/session.json
/// - macOS: ~/Library/Application Support/portfolio-studio/session.json
/// - Windows: %APPDATA%\portfolio-studio\session.json
///
/// The session is constructed once at startup and passed by reference
/// to whatever needs it; nothing else reads or writes the file. It is
/// written only by login, cleared only by logout or a failed token
/// verification.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::state::data::User;

/// On-disk shape of the session file
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "adminToken")]
    token: String,
    #[serde(rename = "adminUser", default)]
    user: Option<User>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("could not access the session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("the session file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// The admin session
#[derive(Debug, Clone)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
    path: PathBuf,
}

impl Session {
    /// Load the session from the default location. A missing or
    /// unreadable file simply means "logged out".
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load the session from an explicit path.
    pub fn load_from(path: PathBuf) -> Self {
        let stored = std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str::<StoredSession>(&text).ok());

        match stored {
            Some(stored) if !stored.token.is_empty() => {
                tracing::info!("restored admin session from {}", path.display());
                Self {
                    token: Some(stored.token),
                    user: stored.user,
                    path,
                }
            }
            _ => Self {
                token: None,
                user: None,
                path,
            },
        }
    }

    /// Where the session file lives by default
    fn default_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user data directory");
        path.push("portfolio-studio");
        path.push("session.json");
        path
    }

    /// Whether a token is held (the admin gate).
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Store a fresh token and user after a successful login.
    ///
    /// The in-memory session is updated even when the write fails, so
    /// the admin area still works for this run; the caller surfaces
    /// the error and the user can log in again next start.
    pub fn login(&mut self, token: String, user: Option<User>) -> Result<(), SessionError> {
        self.token = Some(token.clone());
        self.user = user.clone();

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredSession { token, user };
        std::fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        tracing::info!("admin session stored at {}", self.path.display());
        Ok(())
    }

    /// Drop the session and delete the file. Used by logout and by a
    /// failed token verification.
    pub fn logout(&mut self) {
        self.token = None;
        self.user = None;
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("could not remove session file: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_means_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load_from(dir.path().join("session.json"));
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_login_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::load_from(path.clone());
        session
            .login(
                "abc".to_string(),
                Some(User {
                    id: Some(1),
                    username: "admin".to_string(),
                }),
            )
            .unwrap();

        // The file uses the adminToken/adminUser keys
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"adminToken\": \"abc\""));

        let reloaded = Session::load_from(path);
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.token(), Some("abc"));
        assert_eq!(reloaded.user().unwrap().username, "admin");
    }

    #[test]
    fn test_logout_clears_file_and_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::load_from(path.clone());
        session.login("abc".to_string(), None).unwrap();
        session.logout();

        assert!(!session.is_authenticated());
        assert!(!path.exists());

        // Logging out twice is harmless
        session.logout();
    }

    #[test]
    fn test_corrupt_file_means_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json at all").unwrap();

        let session = Session::load_from(path);
        assert!(!session.is_authenticated());
    }
}
