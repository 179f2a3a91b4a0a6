//! Persisted session file

use std::path::{Path, PathBuf};

use crate::{
    error::{AppError, AppResult},
    models::session::Session,
};

/// JSON file holding the logged-in identity between runs
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session; a missing file is an empty session
    pub async fn load(&self) -> AppResult<Session> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Session::default()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                AppError::Session(format!("corrupt session file {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Session::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, session: &Session) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&self.path, raw).await?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    pub async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::TeacherProfile;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("journal-portal-test-{}-{}", std::process::id(), name))
            .join("session.json")
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_session() {
        let store = SessionStore::new(temp_path("missing"));
        let session = store.load().await.unwrap();
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let store = SessionStore::new(temp_path("roundtrip"));
        let session = Session {
            token: Some("abc".into()),
            teacher_info: Some(TeacherProfile {
                id: 1001,
                name: "Zhang".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), session);
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), Session::default());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let path = temp_path("corrupt");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "{not json").await.unwrap();
        let err = SessionStore::new(path.clone()).load().await.unwrap_err();
        assert!(matches!(err, AppError::Session(_)));
    }
}
