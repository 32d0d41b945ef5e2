//! Gateways to services outside this process.

pub mod oauth;
