//! Keycloak OAuth provider implementation.

use async_trait::async_trait;
use log::*;
use reqwest::{RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{
    oauth_error, oauth_error_from, Error, ErrorKind, HttpErrorKind, OAuthErrorKind,
};
use crate::oauth::token::{TokenResponse, Tokens};
use crate::oauth::{AuthorizationRequest, JsonObject};
use crate::providers::ProviderConfig;

const RESPONSE_TYPE: &str = "code";
const SCOPE: &str = "openid";

/// Keycloak realm provider.
///
/// Talks to the realm's openid-connect endpoints:
/// - Authorization URL generation
/// - Authorization code exchange and refresh
/// - Token introspection
/// - User info retrieval
/// - Back-channel logout
#[derive(Debug)]
pub struct Provider {
    config: ProviderConfig,
    auth_endpoint: Url,
    http_client: reqwest::Client,
}

impl Provider {
    /// Create a new Keycloak provider.
    ///
    /// # Arguments
    ///
    /// * `config` - Realm endpoints and client credentials
    /// * `http_client` - Client carrying the gateway timeout
    pub fn new(config: ProviderConfig, http_client: reqwest::Client) -> Result<Self, Error> {
        let auth_endpoint = Url::parse(&config.auth_url()).map_err(|e| {
            warn!("Invalid Keycloak base URL {}: {:?}", config.base_url, e);
            Error {
                source: Some(Box::new(e)),
                error_kind: ErrorKind::Http(HttpErrorKind::BuilderFailed),
            }
        })?;

        Ok(Self {
            config,
            auth_endpoint,
            http_client,
        })
    }

    /// Send a request and keep only 2xx responses.
    async fn send(
        &self,
        request: RequestBuilder,
        kind: OAuthErrorKind,
        operation: &str,
    ) -> Result<Response, Error> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!("Keycloak {} timed out: {:?}", operation, e);
            } else {
                warn!("Failed to reach Keycloak for {}: {:?}", operation, e);
            }
            oauth_error_from(kind, e)
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Keycloak {} error ({}): {}", operation, status, error_text);
            Err(oauth_error(
                kind,
                &format!("{} returned {}: {}", operation, status, error_text),
            ))
        }
    }

    async fn parse<T: DeserializeOwned>(
        response: Response,
        kind: OAuthErrorKind,
        operation: &str,
    ) -> Result<T, Error> {
        response.json::<T>().await.map_err(|e| {
            warn!("Failed to parse Keycloak {} response: {:?}", operation, e);
            oauth_error_from(kind, e)
        })
    }
}

#[async_trait]
impl crate::oauth::Provider for Provider {
    fn authorization_url(&self, state: &str) -> AuthorizationRequest {
        let mut url = self.auth_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("response_type", RESPONSE_TYPE)
            .append_pair("redirect_uri", &self.config.redirect_uri())
            .append_pair("scope", SCOPE)
            .append_pair("state", state);

        AuthorizationRequest { url: url.into() }
    }

    async fn exchange_code(&self, code: &str) -> Result<Tokens, Error> {
        let kind = OAuthErrorKind::TokenExchangeFailed;
        let redirect_uri = self.config.redirect_uri();
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret().as_str()),
            ("redirect_uri", redirect_uri.as_str()),
        ];

        debug!("Exchanging authorization code at {}", self.config.token_url());

        let request = self.http_client.post(self.config.token_url()).form(&form);
        let response = self.send(request, kind, "token exchange").await?;
        let tokens: TokenResponse = Self::parse(response, kind, "token exchange").await?;

        info!("Successfully exchanged authorization code for tokens");
        Ok(tokens.into())
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<Tokens, Error> {
        let kind = OAuthErrorKind::TokenRefreshFailed;
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret().as_str()),
        ];

        debug!("Refreshing access token");

        let request = self.http_client.post(self.config.token_url()).form(&form);
        let response = self.send(request, kind, "token refresh").await?;
        let tokens: TokenResponse = Self::parse(response, kind, "token refresh").await?;

        info!("Successfully refreshed access token");
        Ok(tokens.into())
    }

    async fn introspect(&self, access_token: &str) -> Result<JsonObject, Error> {
        let kind = OAuthErrorKind::IntrospectionFailed;
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret().as_str()),
            ("token", access_token),
        ];

        let request = self
            .http_client
            .post(self.config.introspection_url())
            .form(&form);
        let response = self.send(request, kind, "introspection").await?;
        let result: JsonObject = Self::parse(response, kind, "introspection").await?;

        debug!(
            "Introspection reported active={}",
            result.get("active").and_then(|v| v.as_bool()).unwrap_or(false)
        );
        Ok(result)
    }

    async fn get_user_info(&self, access_token: &str) -> Result<JsonObject, Error> {
        let kind = OAuthErrorKind::UserInfoFailed;
        let request = self
            .http_client
            .get(self.config.userinfo_url())
            .bearer_auth(access_token);
        let response = self.send(request, kind, "user info").await?;

        Self::parse(response, kind, "user info").await
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), Error> {
        let kind = OAuthErrorKind::LogoutFailed;
        let redirect_uri = self.config.post_logout_redirect_uri();
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret().as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("refresh_token", refresh_token),
        ];

        let request = self.http_client.post(self.config.logout_url()).form(&form);
        self.send(request, kind, "logout").await?;

        info!("Keycloak session logged out");
        Ok(())
    }
}
