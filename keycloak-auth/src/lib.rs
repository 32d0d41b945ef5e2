//! # keycloak-auth
//!
//! The gateway to the identity provider for the authorization code flow:
//! - Realm endpoint construction (`/auth`, `/token`, `/token/introspect`, `/userinfo`, `/logout`)
//! - The remote calls behind an injectable [`oauth::Provider`] trait
//! - CSRF state tokens for the login redirect
//! - HTTP client building with bounded timeouts
//!
//! Nothing in this crate holds tokens between calls; the `domain` crate owns the
//! token store and decides what gets committed.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use keycloak_auth::{
//!     http::HttpClientBuilder,
//!     oauth::{providers::keycloak, Provider, StateManager},
//!     providers::ProviderConfig,
//! };
//! ```

pub mod error;
pub mod http;
pub mod oauth;
pub mod providers;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
