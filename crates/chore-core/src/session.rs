//! Local sign-in state.
//!
//! The session file remembers every user that has signed in on this machine
//! (so a name keeps the same identity across logins) and which of them, if
//! any, is currently signed in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub signed_in_at: DateTime<Utc>,
}

#[async_trait]
pub trait SessionStore {
    async fn current_user(&self) -> Result<Option<User>, CoreError>;
    async fn sign_in(&self, display_name: &str) -> Result<Session, CoreError>;
    /// Returns `false` when nobody was signed in.
    async fn sign_out(&self) -> Result<bool, CoreError>;

    async fn is_authenticated(&self) -> Result<bool, CoreError> {
        Ok(self.current_user().await?.is_some())
    }

    /// The signed-in user, or `Unauthenticated`.
    async fn require_user(&self) -> Result<User, CoreError> {
        self.current_user().await?.ok_or(CoreError::Unauthenticated)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    /// Display name to user id.
    #[serde(default)]
    users: BTreeMap<String, String>,
    #[serde(default)]
    current: Option<Session>,
}

/// JSON file backed [`SessionStore`].
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display names of every user known to this machine, keyed by user id.
    pub async fn user_names(&self) -> Result<BTreeMap<String, String>, CoreError> {
        let file = self.read().await?;
        Ok(file.users.into_iter().map(|(name, id)| (id, name)).collect())
    }

    async fn read(&self) -> Result<SessionFile, CoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, file: &SessionFile) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(file)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn current_user(&self) -> Result<Option<User>, CoreError> {
        Ok(self.read().await?.current.map(|s| s.user))
    }

    async fn sign_in(&self, display_name: &str) -> Result<Session, CoreError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(CoreError::InvalidInput("User name cannot be empty".to_string()));
        }

        let mut file = self.read().await?;
        let id = file
            .users
            .entry(display_name.to_string())
            .or_insert_with(|| Uuid::now_v7().to_string())
            .clone();

        let session = Session {
            user: User {
                id,
                display_name: display_name.to_string(),
            },
            signed_in_at: Utc::now(),
        };
        file.current = Some(session.clone());
        self.write(&file).await?;

        info!(user = %session.user.id, name = display_name, "signed in");
        Ok(session)
    }

    async fn sign_out(&self) -> Result<bool, CoreError> {
        let mut file = self.read().await?;
        let Some(session) = file.current.take() else {
            debug!("sign out without a session");
            return Ok(false);
        };
        self.write(&file).await?;
        info!(user = %session.user.id, "signed out");
        Ok(true)
    }
}
