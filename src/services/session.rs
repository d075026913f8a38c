use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{SessionUser, UserId};

/// Local storage key the sign-in flow writes the current user under.
pub const USER_KEY: &str = "user";

/// Read side of the client's persisted key/value storage.
pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
}

/// Resolves the signed-in user. Anything short of a stored user with a usable
/// id is treated as signed out.
pub fn current_user_id(store: &dyn SessionStore) -> Option<UserId> {
    let raw = match store.get_item(USER_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("no stored user");
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to read stored user");
            return None;
        }
    };

    match serde_json::from_str::<SessionUser>(&raw) {
        Ok(user) => user.user_id(),
        Err(e) => {
            tracing::warn!(error = %e, "stored user is not valid JSON");
            None
        }
    }
}

pub struct SqliteSessionStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteSessionStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    /// Stores `user_json` as the signed-in user. It must be a JSON object with
    /// a usable `id`.
    pub fn sign_in(&self, user_json: &str) -> Result<UserId, AppError> {
        let user: SessionUser = serde_json::from_str(user_json)
            .map_err(|e| AppError::Session(format!("invalid user JSON: {e}")))?;
        let id = user
            .user_id()
            .ok_or_else(|| AppError::Session("user has no id".to_string()))?;

        let db = self.lock()?;
        queries::set_item(&db, USER_KEY, user_json)
            .map_err(|e| AppError::Session(e.to_string()))?;
        tracing::info!(user_id = %id, "signed in");
        Ok(id)
    }

    pub fn sign_out(&self) -> Result<bool, AppError> {
        let db = self.lock()?;
        queries::remove_item(&db, USER_KEY).map_err(|e| AppError::Session(e.to_string()))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::Session("local storage lock poisoned".to_string()))
    }
}

impl SessionStore for SqliteSessionStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let db = self
            .db
            .lock()
            .map_err(|_| anyhow!("local storage lock poisoned"))?;
        queries::get_item(&db, key)
    }
}
