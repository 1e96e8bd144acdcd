//! Persistent storage for the current session
//!
//! The store holds at most one [`Session`]. It has no logic beyond
//! load/save/clear; the authentication service is its only writer.

use std::sync::RwLock;

use super::session::Session;

/// Storage key for the serialized session in localStorage
pub const STORAGE_KEY_SESSION: &str = "campus_portal_session";

/// Where the current session lives between page loads
pub trait TokenStore {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session);
    fn clear(&self);
}

/// Process-local store, used on the server and in tests
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: RwLock<Option<Session>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<Session> {
        match self.session.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn save(&self, session: &Session) {
        match self.session.write() {
            Ok(mut guard) => *guard = Some(session.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(session.clone()),
        }
    }

    fn clear(&self) {
        match self.session.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

/// Browser store backed by `window.localStorage`
#[cfg(not(feature = "ssr"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTokenStore;

#[cfg(not(feature = "ssr"))]
impl BrowserTokenStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(not(feature = "ssr"))]
impl TokenStore for BrowserTokenStore {
    fn load(&self) -> Option<Session> {
        let storage = Self::storage()?;
        let json = storage.get_item(STORAGE_KEY_SESSION).ok()??;
        match serde_json::from_str(&json) {
            Ok(session) => Some(session),
            Err(e) => {
                // Written by an older build or tampered with; drop it
                tracing::warn!("Discarding unreadable stored session: {}", e);
                let _ = storage.remove_item(STORAGE_KEY_SESSION);
                None
            }
        }
    }

    fn save(&self, session: &Session) {
        let Some(storage) = Self::storage() else {
            tracing::warn!("localStorage unavailable, session not persisted");
            return;
        };
        match serde_json::to_string(session) {
            Ok(json) => {
                if storage.set_item(STORAGE_KEY_SESSION, &json).is_err() {
                    tracing::warn!("Failed to write session to localStorage");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize session: {}", e),
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(STORAGE_KEY_SESSION);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::{Role, UserRecord};

    fn session(token: &str) -> Session {
        Session::new(
            token,
            Some("refresh".to_string()),
            UserRecord {
                id: "1".to_string(),
                username: "sam".to_string(),
                email: "sam@uni.edu".to_string(),
                role: Role::Student,
            },
        )
    }

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemoryTokenStore::new();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_memory_store_save_replaces_whole_session() {
        let store = MemoryTokenStore::with_session(session("first"));
        store.save(&session("second"));

        let loaded = store.load().unwrap();
        assert_eq!(loaded.access_token, "second");
    }

    #[test]
    fn test_memory_store_clear_is_idempotent() {
        let store = MemoryTokenStore::with_session(session("token"));
        store.clear();
        store.clear();
        assert!(store.load().is_none());
    }
}
