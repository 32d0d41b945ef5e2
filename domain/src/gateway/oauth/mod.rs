//! OAuth authentication gateway.
//!
//! Re-exports OAuth types from keycloak-auth and provides provider-specific clients.

pub mod keycloak;

// Re-export OAuth types from keycloak-auth
pub use keycloak_auth::oauth::{
    token::{PlainTokens, Tokens},
    AuthorizationRequest, Provider, StateManager,
};
