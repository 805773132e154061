//! Client-held session state
//!
//! Holds the bearer token of the campus backends and the cached TroyaDev
//! session token. The state lives in an explicit [`Session`] handle passed to
//! the request helpers and is persisted through a [`SessionStore`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::user::{TokenClaims, ROLE_ADMIN},
};

/// Persisted session slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub troya_dev_token: Option<String>,
    /// Epoch milliseconds of the last TroyaDev login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub troya_dev_login_time: Option<i64>,
}

/// Durable backing of a session
pub trait SessionStore: Send + Sync {
    fn load(&self) -> AppResult<SessionData>;
    fn save(&self, data: &SessionData) -> AppResult<()>;
}

/// JSON file store
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> AppResult<SessionData> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(SessionData::default()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                AppError::Storage(format!(
                    "Corrupt session file {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionData::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, data: &SessionData) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-process store, nothing survives the process
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<SessionData>,
}

impl SessionStore for MemoryStore {
    fn load(&self) -> AppResult<SessionData> {
        Ok(self.data.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, data: &SessionData) -> AppResult<()> {
        *self.data.lock().unwrap_or_else(|e| e.into_inner()) = data.clone();
        Ok(())
    }
}

/// Shared session handle
#[derive(Clone)]
pub struct Session {
    data: Arc<RwLock<SessionData>>,
    store: Arc<dyn SessionStore>,
}

impl Session {
    /// Open a session from its store
    pub fn open(store: Arc<dyn SessionStore>) -> AppResult<Self> {
        let data = store.load()?;
        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            store,
        })
    }

    /// Session kept in memory only
    pub fn in_memory() -> Self {
        Self {
            data: Arc::new(RwLock::new(SessionData::default())),
            store: Arc::new(MemoryStore::default()),
        }
    }

    pub fn snapshot(&self) -> SessionData {
        self.data.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn update(&self, f: impl FnOnce(&mut SessionData)) -> AppResult<()> {
        let snapshot = {
            let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
            f(&mut data);
            data.clone()
        };
        self.store.save(&snapshot)
    }

    pub fn token(&self) -> Option<String> {
        self.data
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .auth_token
            .clone()
    }

    pub fn set_token(&self, token: impl Into<String>) -> AppResult<()> {
        let token = token.into();
        self.update(|data| data.auth_token = Some(token))
    }

    /// Forget the bearer token. There is no server-side revocation.
    pub fn logout(&self) -> AppResult<()> {
        tracing::info!("Removing stored auth token");
        self.update(|data| data.auth_token = None)
    }

    pub fn is_logged_in(&self) -> bool {
        self.token()
            .map(|token| is_token_valid(&token, Utc::now().timestamp()))
            .unwrap_or(false)
    }

    fn claims(&self) -> Option<TokenClaims> {
        let token = self.token()?;
        match TokenClaims::decode_unverified(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::error!("Error decoding token: {}", e);
                None
            }
        }
    }

    pub fn roles(&self) -> Option<Vec<String>> {
        self.claims().and_then(|claims| claims.roles)
    }

    pub fn sub(&self) -> Option<String> {
        self.claims().and_then(|claims| claims.sub)
    }

    pub fn is_admin(&self) -> bool {
        self.claims()
            .map(|claims| claims.has_role(ROLE_ADMIN))
            .unwrap_or(false)
    }

    /// Cached TroyaDev token, if it was obtained less than `ttl` before `now_ms`.
    /// An expired entry is removed from the store.
    pub fn troya_dev_token(&self, ttl: Duration, now_ms: i64) -> AppResult<Option<String>> {
        let data = self.snapshot();
        if let (Some(token), Some(login_time)) = (&data.troya_dev_token, data.troya_dev_login_time) {
            if now_ms - login_time < ttl.as_millis() as i64 {
                return Ok(Some(token.clone()));
            }
        }
        if data.troya_dev_token.is_some() || data.troya_dev_login_time.is_some() {
            tracing::debug!("TroyaDev session expired");
            self.update(|data| {
                data.troya_dev_token = None;
                data.troya_dev_login_time = None;
            })?;
        }
        Ok(None)
    }

    pub fn set_troya_dev_token(&self, token: impl Into<String>, now_ms: i64) -> AppResult<()> {
        let token = token.into();
        self.update(|data| {
            data.troya_dev_token = Some(token);
            data.troya_dev_login_time = Some(now_ms);
        })
    }
}

/// A token is valid when its claims decode and `exp` lies after `now` (seconds)
pub fn is_token_valid(token: &str, now: i64) -> bool {
    TokenClaims::decode_unverified(token)
        .map(|claims| claims.is_valid_at(now))
        .unwrap_or(false)
}
