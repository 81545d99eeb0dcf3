use super::{CookieJar, TokenStoreError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-process cookie jar
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    entries: Mutex<HashMap<String, (String, DateTime<Utc>)>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, (String, DateTime<Utc>)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, TokenStoreError> {
        let mut entries = self.entries();
        match entries.get(name) {
            Some((value, expires_at)) if *expires_at > Utc::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(name);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(
        &self,
        name: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenStoreError> {
        self.entries()
            .insert(name.to_owned(), (value.to_owned(), expires_at));
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), TokenStoreError> {
        self.entries().remove(name);
        Ok(())
    }
}
