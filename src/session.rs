//! Bearer token persisted between invocations.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn open() -> Self {
        let path = if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "careers") {
            proj_dirs.data_dir().join("session.json")
        } else {
            PathBuf::from("careers-session.json")
        };
        Self { path }
    }

    #[cfg(test)]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        let session = serde_json::from_str(&raw)
            .with_context(|| format!("Corrupt session file: {}", self.path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, token: &str) -> Result<Session> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let session = Session {
            token: token.trim().to_string(),
            saved_at: Utc::now(),
        };
        let mut file = create_private(&self.path)
            .with_context(|| format!("Failed to create session file: {}", self.path.display()))?;
        file.write_all(serde_json::to_string_pretty(&session)?.as_bytes())
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        Ok(session)
    }

    /// Returns whether a session existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove session file: {}", self.path.display()))?;
        Ok(true)
    }

    /// `CAREERS_TOKEN` wins over the stored session.
    pub fn resolve_token(&self, env_token: Option<String>) -> Result<Option<String>> {
        if let Some(token) = env_token.filter(|t| !t.trim().is_empty()) {
            return Ok(Some(token.trim().to_string()));
        }
        Ok(self.load()?.map(|s| s.token))
    }
}

/// Open for writing with owner-only permissions before any byte lands.
/// `mode` only applies on creation, so an existing file is tightened too.
#[cfg(unix)]
fn create_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> std::io::Result<File> {
    File::create(path)
}

/// Show enough of a token to recognise it.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("data").join("session.json"));

        assert!(store.load().unwrap().is_none());
        store.save("  eyJhbGciOi.token.value \n").unwrap();

        let session = store.load().unwrap().unwrap();
        assert_eq!(session.token, "eyJhbGciOi.token.value");

        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        store.save("secret").unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_readable_file_is_tightened_before_write() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "old contents that are longer than the new session").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = SessionStore::at(&path);
        store.save("rotated").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap().unwrap().token, "rotated");
    }

    #[test]
    fn test_env_token_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        store.save("stored").unwrap();

        assert_eq!(
            store.resolve_token(Some("from-env".into())).unwrap(),
            Some("from-env".to_string())
        );
        assert_eq!(
            store.resolve_token(Some("  ".into())).unwrap(),
            Some("stored".to_string())
        );
        assert_eq!(store.resolve_token(None).unwrap(), Some("stored".to_string()));
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abc"), "***");
        assert_eq!(mask_token("abcdefghijkl"), "abcd...ijkl");
    }
}
