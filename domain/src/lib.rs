//! The authorization code flow and everything it keeps between requests.
//!
//! `web` depends on this crate only; the remote calls live in `keycloak-auth`
//! and are reached through [`gateway::oauth`].

pub use keycloak_auth::oauth::JsonObject;

pub mod error;
pub mod gateway;
pub mod jwt;
pub mod oauth_flow;
pub mod redirect;
pub mod token_store;
