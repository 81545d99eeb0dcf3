//! Authentication endpoints

use super::{
    error::ClientError,
    typed::{AuthenticatedClient, PublicClient},
};
use crate::types::{
    AuthResponse, AvailabilityField, AvailabilityRequest, AvailabilityResponse, RefreshRequest,
    SignInRequest, SignUpRequest, TokenPair,
};
use reqwest::Method;
use tracing::info;

/// Authentication endpoints for public client
impl PublicClient {
    /// Sign in with an email or username
    pub async fn sign_in(&self, login: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let request = self
            .request(Method::POST, "/auth/signin")
            .json(&SignInRequest { login, password });
        self.execute(request).await
    }

    /// Create an account
    pub async fn sign_up(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let request = self
            .request(Method::POST, "/auth/signup")
            .json(&SignUpRequest {
                email,
                username,
                password,
            });
        self.execute(request).await
    }

    /// Ask whether an email or username is still free
    pub async fn check_availability(
        &self,
        field: AvailabilityField,
        value: &str,
    ) -> Result<AvailabilityResponse, ClientError> {
        let request = self
            .request(Method::POST, "/auth/check-availability")
            .json(&AvailabilityRequest { field, value });
        self.execute(request).await
    }

    /// Exchange a refresh token for a new pair
    ///
    /// This is the raw exchange; it neither reads nor writes a token store.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ClientError> {
        let request = self
            .request(Method::POST, "/auth/refresh")
            .json(&RefreshRequest { refresh_token });
        self.execute(request).await
    }
}

/// Session management for authenticated client
impl AuthenticatedClient {
    /// Sign in and persist the returned pair
    pub async fn sign_in(&self, login: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let response = self.to_public().sign_in(login, password).await?;
        self.tokens().store_pair(&response.tokens)?;
        info!("Signed in");
        Ok(response)
    }

    /// Sign up and persist the returned pair
    pub async fn sign_up(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let response = self.to_public().sign_up(email, username, password).await?;
        self.tokens().store_pair(&response.tokens)?;
        info!("Account created");
        Ok(response)
    }

    /// Forget the stored session
    pub fn sign_out(&self) -> Result<(), ClientError> {
        self.tokens().clear()?;
        info!("Signed out");
        Ok(())
    }

    /// An access token is stored
    pub fn has_session(&self) -> bool {
        self.tokens().has_session()
    }
}
