//! OAuth provider trait and types.

use async_trait::async_trait;

use super::token::Tokens;
use crate::error::Error;

/// An opaque JSON object returned by the provider (introspection result, user info).
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Authorization request with the URL to redirect the browser to.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Authorization URL to redirect the user to, with the state already embedded.
    pub url: String,
}

/// Trait for the remote side of the Authorization Code Grant.
///
/// Implementations only read their own configuration and the tokens passed in;
/// they never hold local flow state. Every async method is a network call and
/// may fail or time out.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Build the authorization endpoint URL carrying `state`.
    fn authorization_url(&self, state: &str) -> AuthorizationRequest;

    /// Exchange an authorization code for access, ID and refresh tokens.
    async fn exchange_code(&self, code: &str) -> Result<Tokens, Error>;

    /// Obtain fresh tokens with a refresh token.
    async fn refresh_token(&self, refresh_token: &str) -> Result<Tokens, Error>;

    /// Ask the provider to report on an access token.
    async fn introspect(&self, access_token: &str) -> Result<JsonObject, Error>;

    /// Fetch the claims about the authenticated user.
    async fn get_user_info(&self, access_token: &str) -> Result<JsonObject, Error>;

    /// End the provider session that issued `refresh_token`.
    async fn logout(&self, refresh_token: &str) -> Result<(), Error>;
}
