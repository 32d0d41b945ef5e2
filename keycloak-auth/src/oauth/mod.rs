//! OAuth 2.0 Authorization Code Grant infrastructure.
//!
//! Provides the provider trait, the Keycloak implementation and CSRF state handling.

mod provider;
mod state;

pub mod providers;
pub mod token;

pub use provider::{AuthorizationRequest, JsonObject, Provider};
pub use state::{StateData, StateManager};
