//! Token endpoint wire format and the token set handed to callers.

mod tokens;

pub(crate) use tokens::TokenResponse;
pub use tokens::{PlainTokens, Tokens};
