use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for starting a login
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct LoginParams {
    /// Local path to resume at after login
    pub(crate) redirect: Option<String>,
}

/// Query parameters the provider sends back to `/callback`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct CallbackParams {
    /// Authorization code issued by the provider
    pub(crate) code: Option<String>,
    /// State token issued by `/login`
    pub(crate) state: Option<String>,
    /// Error code when the provider refused the authorization
    pub(crate) error: Option<String>,
    pub(crate) error_description: Option<String>,
}
