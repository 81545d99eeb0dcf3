use super::{CookieJar, TokenStoreError};
use chrono::{DateTime, Utc};
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

/// Cookie jar over `document.cookie`
///
/// Holds no handle to the document; each call looks it up again so the jar
/// stays `Send + Sync`.
#[derive(Debug, Clone, Copy)]
pub struct DocumentCookieJar;

impl DocumentCookieJar {
    /// `Some` only when running with a window and an HTML document
    pub fn detect() -> Option<Self> {
        document().map(|_| Self)
    }

    fn write(cookie: &str) -> Result<(), TokenStoreError> {
        let document = document()
            .ok_or_else(|| TokenStoreError::Unavailable("no document".into()))?;
        document
            .set_cookie(cookie)
            .map_err(|err| TokenStoreError::Unavailable(format!("{err:?}")))
    }
}

fn document() -> Option<HtmlDocument> {
    web_sys::window()?
        .document()?
        .dyn_into::<HtmlDocument>()
        .ok()
}

/// Undo `encodeURIComponent`; values written by other code may be raw
fn decode(value: &str) -> String {
    js_sys::decode_uri_component(value)
        .map(String::from)
        .unwrap_or_else(|_| value.to_owned())
}

impl CookieJar for DocumentCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, TokenStoreError> {
        let Some(document) = document() else {
            return Ok(None);
        };
        let cookies = document
            .cookie()
            .map_err(|err| TokenStoreError::Unavailable(format!("{err:?}")))?;

        Ok(cookies.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| decode(value))
        }))
    }

    fn set(
        &self,
        name: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenStoreError> {
        let expires = expires_at.format("%a, %d %b %Y %H:%M:%S GMT");
        let value = String::from(js_sys::encode_uri_component(value));
        Self::write(&format!(
            "{name}={value}; expires={expires}; path=/; SameSite=Lax"
        ))
    }

    fn remove(&self, name: &str) -> Result<(), TokenStoreError> {
        Self::write(&format!("{name}=; Max-Age=0; path=/"))
    }
}
