//! Keycloak realm settings and endpoint construction.

use secrecy::SecretString;

const OIDC_PATH: &str = "protocol/openid-connect";

/// Provider configuration with endpoints and client credentials.
///
/// Immutable for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the Keycloak server (e.g. `http://localhost:8080`).
    pub base_url: String,
    /// Realm name.
    pub realm: String,
    /// Confidential client identifier.
    pub client_id: String,
    /// Client secret.
    pub client_secret: SecretString,
    /// Public base URL of this application, used to build `redirect_uri`.
    pub redirect_base: String,
}

impl ProviderConfig {
    pub fn new(
        base_url: &str,
        realm: &str,
        client_id: &str,
        client_secret: SecretString,
        redirect_base: &str,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            realm: realm.to_string(),
            client_id: client_id.to_string(),
            client_secret,
            redirect_base: redirect_base.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/realms/{}/{}/{}",
            self.base_url, self.realm, OIDC_PATH, path
        )
    }

    /// Authorization endpoint the browser is redirected to.
    pub fn auth_url(&self) -> String {
        self.endpoint("auth")
    }

    pub fn token_url(&self) -> String {
        self.endpoint("token")
    }

    pub fn introspection_url(&self) -> String {
        self.endpoint("token/introspect")
    }

    pub fn userinfo_url(&self) -> String {
        self.endpoint("userinfo")
    }

    pub fn logout_url(&self) -> String {
        self.endpoint("logout")
    }

    /// The fixed local callback the provider sends the authorization code to.
    pub fn redirect_uri(&self) -> String {
        format!("{}/callback", self.redirect_base)
    }

    /// Where the provider sends the browser after logout.
    pub fn post_logout_redirect_uri(&self) -> String {
        format!("{}/", self.redirect_base)
    }
}
