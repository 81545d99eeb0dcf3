//! Type-safe API clients that enforce authentication requirements at compile time

use super::{
    ClientError, DEFAULT_USER_AGENT, decode, error_for_status, is_auth_rejection,
    refresh::RefreshCoordinator, store::TokenStore,
};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Client for public endpoints that don't require authentication
#[derive(Clone)]
pub struct PublicClient {
    client: Client,
    base_url: String,
}

/// Client for endpoints that require a session
///
/// Clones share the token store and the refresh coordinator, so concurrent
/// calls from any clone take part in the same single refresh.
#[derive(Clone)]
pub struct AuthenticatedClient {
    public: PublicClient,
    tokens: TokenStore,
    coordinator: Arc<RefreshCoordinator>,
}

fn build_http_client(
    timeout: Option<Duration>,
    user_agent: Option<String>,
) -> Result<Client, ClientError> {
    let user_agent = user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    #[cfg(not(target_arch = "wasm32"))]
    let client = {
        let mut builder = ClientBuilder::new().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()?
    };

    #[cfg(target_arch = "wasm32")]
    let client = {
        let _ = timeout; // Timeouts not supported on WASM
        ClientBuilder::new().user_agent(user_agent).build()?
    };

    Ok(client)
}

impl PublicClient {
    /// Create a new public client
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        TypedClientBuilder::new().base_url(base_url).build_public()
    }

    fn from_parts(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder without authentication
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Send a request; non-2xx statuses become errors, auth failures included
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_for_status(response).await)
        }
    }

    /// Execute a request and decode the JSON body
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        decode(self.send(request).await?).await
    }

    /// Execute a request whose response body is irrelevant
    pub async fn execute_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        self.send(request).await.map(drop)
    }

    /// Turn into an authenticated client reading tokens from `tokens`
    pub fn authenticate(self, tokens: TokenStore) -> AuthenticatedClient {
        AuthenticatedClient::new(self, tokens)
    }
}

impl AuthenticatedClient {
    /// Create an authenticated client with its own refresh coordinator
    pub fn new(public: PublicClient, tokens: TokenStore) -> Self {
        Self::with_coordinator(public, tokens, Arc::new(RefreshCoordinator::new()))
    }

    /// Create an authenticated client around an existing coordinator
    pub fn with_coordinator(
        public: PublicClient,
        tokens: TokenStore,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            public,
            tokens,
            coordinator,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.public.base_url()
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    /// Create a public client (useful for calling public endpoints)
    pub fn to_public(&self) -> PublicClient {
        self.public.clone()
    }

    /// Create a request builder; the bearer token is attached when it is sent
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.public.request(method, path)
    }

    /// Send a request, refreshing the session once on 401/403
    ///
    /// The request is cloned up front for the replay; bodies that can't be
    /// cloned fail with [`ClientError::NotReplayable`] if a replay is needed.
    /// Use [`Self::send_with`] for those.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let replay = request.try_clone();
        self.dispatch(request, move || replay.ok_or(ClientError::NotReplayable))
            .await
    }

    /// Like [`Self::send`], rebuilding the request from `build` for the replay
    pub async fn send_with<F>(&self, build: F) -> Result<Response, ClientError>
    where
        F: Fn() -> Result<RequestBuilder, ClientError>,
    {
        self.dispatch(build()?, &build).await
    }

    /// Execute a request and decode the JSON body
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        decode(self.send(request).await?).await
    }

    /// Execute a request whose response body is irrelevant
    pub async fn execute_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        self.send(request).await.map(drop)
    }

    async fn dispatch<R>(&self, request: RequestBuilder, replay: R) -> Result<Response, ClientError>
    where
        R: FnOnce() -> Result<RequestBuilder, ClientError>,
    {
        let used = self.tokens.access_token();
        let response = authorize(request, used.as_deref()).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }
        if !is_auth_rejection(status) {
            return Err(error_for_status(response).await);
        }

        debug!(status = status.as_u16(), "Request rejected, refreshing session");
        let token = self
            .coordinator
            .refresh(&self.tokens, used.as_deref(), |refresh_token| async move {
                self.public.refresh(&refresh_token).await
            })
            .await?;

        debug!("Replaying request with rotated token");
        let response = authorize(replay()?, Some(&token)).send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_for_status(response).await)
        }
    }
}

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Type-safe builder that creates the appropriate client type
#[derive(Debug, Default)]
pub struct TypedClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TypedClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[cfg(not(target_arch = "wasm32"))]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build a public client
    pub fn build_public(self) -> Result<PublicClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;
        let client = build_http_client(self.timeout, self.user_agent)?;
        Ok(PublicClient::from_parts(client, base_url))
    }

    /// Build an authenticated client over `tokens`
    pub fn build_authenticated(
        self,
        tokens: TokenStore,
    ) -> Result<AuthenticatedClient, ClientError> {
        Ok(self.build_public()?.authenticate(tokens))
    }
}
