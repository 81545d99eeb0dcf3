use super::{CookieJar, TokenStoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tempfile::NamedTempFile;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    expires_at: DateTime<Utc>,
}

type Cookies = BTreeMap<String, StoredCookie>;

/// Cookie jar persisted as a JSON file
///
/// Every operation reads the file, so several processes sharing one file see
/// each other's writes. Expired entries are dropped whenever the file is
/// rewritten.
#[derive(Debug)]
pub struct FileCookieJar {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileCookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Cookies, TokenStoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Cookies::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Cookies::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, cookies: &Cookies) -> Result<(), TokenStoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // Each writer gets its own sibling file; the rename is atomic, so
        // readers and concurrent writers never see a partial map
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(cookies)?)?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Cookies)) -> Result<(), TokenStoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut cookies = match self.load() {
            Ok(cookies) => cookies,
            Err(TokenStoreError::Serialization(err)) => {
                warn!(path = %self.path.display(), error = %err, "Replacing corrupt cookie file");
                Cookies::new()
            }
            Err(err) => return Err(err),
        };
        let now = Utc::now();
        cookies.retain(|_, cookie| cookie.expires_at > now);
        apply(&mut cookies);
        self.save(&cookies)
    }
}

impl CookieJar for FileCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, TokenStoreError> {
        let cookies = self.load()?;
        Ok(cookies
            .get(name)
            .filter(|cookie| cookie.expires_at > Utc::now())
            .map(|cookie| cookie.value.clone()))
    }

    fn set(
        &self,
        name: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenStoreError> {
        self.update(|cookies| {
            cookies.insert(
                name.to_owned(),
                StoredCookie {
                    value: value.to_owned(),
                    expires_at,
                },
            );
        })
    }

    fn remove(&self, name: &str) -> Result<(), TokenStoreError> {
        self.update(|cookies| {
            cookies.remove(name);
        })
    }
}
