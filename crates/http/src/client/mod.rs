//! JobLlama HTTP client
//!
//! Two call surfaces: [`PublicClient`] never touches tokens and serves the
//! sign-in, sign-up, availability and refresh endpoints.
//! [`AuthenticatedClient`] attaches the stored access token and recovers
//! from 401/403 through a single coordinated refresh.

pub mod auth;
pub mod config;
pub mod cover_letters;
pub mod error;
pub mod job_flows;
pub mod job_queries;
pub mod refresh;
pub mod resumes;
pub mod store;
pub mod typed;

pub use config::ClientConfig;
pub use error::ClientError;
pub use refresh::RefreshCoordinator;
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileCookieJar;
pub use store::{CookieJar, MemoryCookieJar, TokenKind, TokenStore};
pub use typed::{AuthenticatedClient, PublicClient, TypedClientBuilder};

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

/// Default base URL of the JobLlama API
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("jobllama-client/", env!("CARGO_PKG_VERSION"));

/// Statuses that send a request through the refresh path
fn is_auth_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Turn a non-2xx response into a typed error
async fn error_for_status(response: Response) -> ClientError {
    let status = response.status();
    let message = response.text().await.unwrap_or_else(|_| status.to_string());
    ClientError::from_status(status, message)
}

/// Decode a successful JSON response
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
