//! Credential Storage
//!
//! Bearer token persistence. The browser build keeps it in `localStorage`.

use std::cell::RefCell;

const TOKEN_KEY: &str = "ntu_coder_token";

pub trait CredentialStore {
    fn token(&self) -> Option<String>;
    fn store(&self, token: &str);
    fn clear(&self);
}

/// `window.localStorage`-backed token store
#[derive(Debug, Default)]
pub struct LocalStorageCredentials;

impl LocalStorageCredentials {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|win| win.local_storage().ok().flatten())
    }
}

impl CredentialStore for LocalStorageCredentials {
    fn token(&self) -> Option<String> {
        Self::storage()
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten())
            .filter(|t| !t.trim().is_empty())
    }

    fn store(&self, token: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(TOKEN_KEY, token).is_err() {
                log::warn!("[AUTH] could not persist token");
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }
}

/// Process-local token store (tests, private browsing fallback)
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    token: RefCell<Option<String>>,
}

impl MemoryCredentials {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl CredentialStore for MemoryCredentials {
    fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn store(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.borrow_mut() = None;
    }
}

/// True when `localStorage` can be used in this browser session
pub fn local_storage_available() -> bool {
    LocalStorageCredentials::storage().is_some()
}
