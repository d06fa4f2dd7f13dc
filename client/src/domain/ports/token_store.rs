//! Driven port for the persisted bearer token slot.
//!
//! The slot survives restarts and holds at most one token. Only the session
//! manager writes it; every other component reads session state instead.

use std::sync::Mutex;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::AccessToken;

define_port_error! {
    /// Errors surfaced by token store adapters.
    pub enum TokenStoreError {
        /// The backing storage could not be read or written.
        Io { message: String } => "token store i/o failed: {message}",
        /// The stored value could not be interpreted.
        Corrupt { message: String } => "token store is corrupt: {message}",
    }
}

/// Port for the single persisted token slot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the raw stored value, if any.
    ///
    /// The value is returned unparsed so the session manager can treat a
    /// malformed token as "signed out" and clear it.
    async fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// Replace the stored token.
    async fn save(&self, token: &AccessToken) -> Result<(), TokenStoreError>;

    /// Remove the stored token. Clearing an empty slot succeeds.
    async fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Process-local token store, for embedding and tests.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl InMemoryTokenStore {
    /// Create a store pre-populated with a raw value.
    pub fn with_value(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// Current raw value.
    pub fn peek(&self) -> Option<String> {
        self.slot
            .lock()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |slot| slot.clone())
    }

    fn replace(&self, value: Option<String>) {
        match self.slot.lock() {
            Ok(mut slot) => *slot = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.peek())
    }

    async fn save(&self, token: &AccessToken) -> Result<(), TokenStoreError> {
        self.replace(Some(token.expose().to_owned()));
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        self.replace(None);
        Ok(())
    }
}
