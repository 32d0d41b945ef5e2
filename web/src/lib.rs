//! HTTP surface of the authorization code flow.
//!
//! Each route maps to one flow step; every step answers with a redirect. The
//! `/private` tree sits behind the access guard in [`protect::private`].

use domain::error::Error as DomainError;
use domain::gateway::oauth::{keycloak, Provider, StateManager};
use domain::jwt::AccessTokenVerifier;
use domain::token_store::TokenStore;
use log::*;
use service::config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;

mod controller;
mod error;
mod extractors;
mod params;
mod protect;
mod response;
pub mod router;

pub use error::{Error, Result};

// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub token_store: TokenStore,
    pub login_states: StateManager,
    provider: Arc<dyn Provider>,
    verifier: AccessTokenVerifier,
}

impl AppState {
    /// Builds the provider gateway and the token verifier from `config`.
    pub fn new(config: Config) -> core::result::Result<Self, DomainError> {
        let provider = keycloak::new_provider(&config)?;
        let verifier = AccessTokenVerifier::from_config(&config)?;
        let login_states = keycloak::new_state_manager(&config);

        Ok(Self {
            config,
            token_store: TokenStore::new(),
            login_states,
            provider: Arc::new(provider),
            verifier,
        })
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    pub fn verifier(&self) -> &AccessTokenVerifier {
        &self.verifier
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state.config.interface().to_string();
    let port = app_state.config.port;
    let listener = TcpListener::bind(format!("{interface}:{port}")).await?;

    info!("Server starting... listening for connections on http://{interface}:{port}");
    axum::serve(listener, router::define_routes(app_state)).await
}
