use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Identity held by a logged-in client.
///
/// There is no expiry or refresh: a client is logged in while a session is
/// present in its store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: i32,
    pub name: String,
}

/// Where a client keeps its session between requests
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<Session>;

    fn save(&self, session: &Session) -> anyhow::Result<()>;

    fn clear(&self) -> anyhow::Result<()>;
}

/// Session kept for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.session.read().ok().and_then(|s| s.clone())
    }

    fn save(&self, session: &Session) -> anyhow::Result<()> {
        let mut guard = self
            .session
            .write()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        let mut guard = self
            .session
            .write()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// Session persisted as a small JSON file, surviving restarts
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                None
            }
        }
    }

    fn save(&self, session: &Session) -> anyhow::Result<()> {
        let contents = serde_json::to_string(session)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
