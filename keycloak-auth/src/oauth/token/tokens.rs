//! Tokens issued by the realm's token endpoint.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Tokens returned by the token endpoint.
///
/// Lifetimes reported by the provider are not kept; the access token's own
/// `exp` claim is what the guard checks.
#[derive(Debug, Clone)]
pub struct Tokens {
    pub access_token: SecretString,
    /// OpenID Connect ID token, present when the `openid` scope was granted.
    pub id_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
}

/// Plain-text view of [`Tokens`] for handing over to the token store.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainTokens {
    pub access_token: String,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Tokens {
    pub fn into_plain(self) -> PlainTokens {
        PlainTokens {
            access_token: self.access_token.expose_secret().clone(),
            id_token: self.id_token.map(|t| t.expose_secret().clone()),
            refresh_token: self.refresh_token.map(|t| t.expose_secret().clone()),
        }
    }
}

/// Wire format of a successful token endpoint response.
///
/// A body without `access_token` fails to deserialize and is treated as malformed.
/// Other members Keycloak sends (`expires_in`, `scope`, `session_state`) are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl From<TokenResponse> for Tokens {
    fn from(response: TokenResponse) -> Self {
        Tokens {
            access_token: SecretString::new(response.access_token),
            id_token: response.id_token.map(SecretString::new),
            refresh_token: response.refresh_token.map(SecretString::new),
        }
    }
}
