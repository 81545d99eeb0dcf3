//! Persistent storage for the access/refresh token pair
//!
//! Tokens live in a cookie jar under two well-known names, each with its own
//! expiry. A [`TokenStore`] without a jar models code running outside a
//! browsing context: reads return `None` and writes are no-ops.

#[cfg(not(target_arch = "wasm32"))]
mod file;
mod memory;
#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileCookieJar;
pub use memory::MemoryCookieJar;
#[cfg(target_arch = "wasm32")]
pub use browser::DocumentCookieJar;

use crate::types::TokenPair;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Token store errors
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Reading or writing the backing file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file holds something other than a cookie map
    #[error("Corrupt cookie file: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The environment refused the write
    #[error("Cookie storage unavailable: {0}")]
    Unavailable(String),
}

/// The two tokens the store knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub const ALL: [Self; 2] = [Self::Access, Self::Refresh];

    /// Cookie name the token is stored under
    pub const fn cookie_name(self) -> &'static str {
        match self {
            Self::Access => "access_token",
            Self::Refresh => "refresh_token",
        }
    }

    /// Cookie lifetime: 7 days for access, 30 for refresh
    pub fn max_age(self) -> Duration {
        match self {
            Self::Access => Duration::days(7),
            Self::Refresh => Duration::days(30),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cookie_name())
    }
}

/// Name/value storage with per-entry expiry
///
/// Implementations must treat an expired entry as absent.
pub trait CookieJar: fmt::Debug + Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>, TokenStoreError>;

    fn set(&self, name: &str, value: &str, expires_at: DateTime<Utc>)
        -> Result<(), TokenStoreError>;

    fn remove(&self, name: &str) -> Result<(), TokenStoreError>;
}

/// Access/refresh token accessor
#[derive(Debug, Clone)]
pub struct TokenStore {
    jar: Option<Arc<dyn CookieJar>>,
}

impl TokenStore {
    /// Store backed by the given jar
    pub fn new(jar: impl CookieJar + 'static) -> Self {
        Self {
            jar: Some(Arc::new(jar)),
        }
    }

    /// Store backed by an in-process jar
    pub fn in_memory() -> Self {
        Self::new(MemoryCookieJar::new())
    }

    /// Store with no backing jar; every operation is a no-op
    pub fn detached() -> Self {
        Self { jar: None }
    }

    /// Store backed by `document.cookie`, or detached when there is no window
    #[cfg(target_arch = "wasm32")]
    pub fn from_browser() -> Self {
        match DocumentCookieJar::detect() {
            Some(jar) => Self::new(jar),
            None => Self::detached(),
        }
    }

    /// Whether a jar is attached
    pub fn is_attached(&self) -> bool {
        self.jar.is_some()
    }

    /// Read a token; unreadable storage counts as absent
    pub fn get(&self, kind: TokenKind) -> Option<String> {
        let jar = self.jar.as_ref()?;
        match jar.get(kind.cookie_name()) {
            Ok(value) => value.filter(|value| !value.is_empty()),
            Err(err) => {
                warn!(token = %kind, error = %err, "Failed to read token");
                None
            }
        }
    }

    /// Write a token with its kind's expiry
    pub fn set(&self, kind: TokenKind, value: &str) -> Result<(), TokenStoreError> {
        let Some(jar) = &self.jar else {
            return Ok(());
        };
        jar.set(kind.cookie_name(), value, Utc::now() + kind.max_age())
    }

    pub fn remove(&self, kind: TokenKind) -> Result<(), TokenStoreError> {
        let Some(jar) = &self.jar else {
            return Ok(());
        };
        jar.remove(kind.cookie_name())
    }

    pub fn access_token(&self) -> Option<String> {
        self.get(TokenKind::Access)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.get(TokenKind::Refresh)
    }

    /// Persist a freshly minted pair; both tokens are written
    ///
    /// If the refresh token can't be written the new access token is not
    /// left behind next to the old refresh token: both are removed.
    pub fn store_pair(&self, pair: &TokenPair) -> Result<(), TokenStoreError> {
        self.set(TokenKind::Access, &pair.access_token)?;
        if let Err(err) = self.set(TokenKind::Refresh, &pair.refresh_token) {
            warn!(error = %err, "Failed to store refresh token, dropping the session");
            if let Err(clear_err) = self.clear() {
                warn!(error = %clear_err, "Failed to clear half-written session");
            }
            return Err(err);
        }
        Ok(())
    }

    /// Remove both tokens, attempting each even if the first fails
    pub fn clear(&self) -> Result<(), TokenStoreError> {
        let access = self.remove(TokenKind::Access);
        let refresh = self.remove(TokenKind::Refresh);
        access.and(refresh)
    }

    /// An access token is present
    pub fn has_session(&self) -> bool {
        self.access_token().is_some()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
