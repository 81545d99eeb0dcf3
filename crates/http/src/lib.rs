//! JobLlama API client
//!
//! Typed access to the JobLlama REST API: sign-in and session handling,
//! résumés, cover letters, job queries and job flows. Authenticated calls
//! share a cookie-backed [`client::TokenStore`] and recover from expired
//! access tokens through a single coordinated refresh.

pub mod types;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "client")]
pub use client::{AuthenticatedClient, ClientConfig, ClientError, PublicClient, TokenStore};
