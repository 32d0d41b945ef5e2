//! Keycloak OAuth client.
//!
//! Provides a configured Keycloak provider for the flow steps.

use crate::error::Error;
use keycloak_auth::http::HttpClientBuilder;
use keycloak_auth::oauth::providers::keycloak::Provider as KeycloakProvider;
use keycloak_auth::oauth::StateManager;
use keycloak_auth::providers::ProviderConfig;
use log::*;
use secrecy::SecretString;
use service::config::Config;
use std::time::Duration;

const MAX_LOGIN_STATE_TTL_SECS: u64 = 24 * 60 * 60;

/// Create a new Keycloak provider from the realm settings in `config`.
///
/// Fails with a config error when the client id or secret is missing.
///
/// # Example
///
/// ```rust,ignore
/// use domain::gateway::oauth::keycloak;
///
/// let provider = keycloak::new_provider(&config)?;
/// ```
pub fn new_provider(config: &Config) -> Result<KeycloakProvider, Error> {
    let client_id = config.keycloak_client_id().ok_or_else(|| {
        warn!("KEYCLOAK_CLIENT_ID is not set");
        Error::config("missing Keycloak client id")
    })?;
    let client_secret = config.keycloak_client_secret().ok_or_else(|| {
        warn!("KEYCLOAK_CLIENT_SECRET is not set");
        Error::config("missing Keycloak client secret")
    })?;

    let provider_config = ProviderConfig::new(
        config.keycloak_base(),
        config.keycloak_realm(),
        &client_id,
        SecretString::new(client_secret),
        &config.redirect_base(),
    );

    let http_client = HttpClientBuilder::new()
        .with_timeout(Duration::from_secs(config.gateway_timeout_secs))
        .build()
        .map_err(keycloak_auth::Error::from)?;

    info!(
        "Using Keycloak realm {} at {}",
        config.keycloak_realm(),
        config.keycloak_base()
    );
    Ok(KeycloakProvider::new(provider_config, http_client)?)
}

/// Create the state manager for login redirects, honoring the configured TTL.
pub fn new_state_manager(config: &Config) -> StateManager {
    let ttl = config.login_state_ttl_secs.min(MAX_LOGIN_STATE_TTL_SECS);
    StateManager::with_ttl(chrono::Duration::seconds(ttl as i64))
}
