//! Concrete OAuth provider implementations.

pub mod keycloak;
