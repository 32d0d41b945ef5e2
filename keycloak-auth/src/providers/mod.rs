//! Realm configuration.

mod config;

pub use config::ProviderConfig;
