//! Views of the flow state.
//!
//! Raw tokens are reduced to presence flags; the introspection result and user
//! info are shown as the provider returned them.

use domain::jwt::AccessClaims;
use domain::oauth_flow::{FlowSnapshot, FlowState};
use domain::JsonObject;
use serde::Serialize;
use utoipa::ToSchema;

/// What the home view shows about the current flow.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FlowView {
    /// One of `anonymous`, `authorizing`, `code_received`, `authenticated`
    #[schema(value_type = String)]
    pub flow_state: FlowState,
    pub has_authorization_code: bool,
    pub has_access_token: bool,
    pub has_id_token: bool,
    pub has_refresh_token: bool,
    #[schema(value_type = Option<Object>)]
    pub introspection_result: Option<JsonObject>,
    #[schema(value_type = Option<Object>)]
    pub user_info: Option<JsonObject>,
}

impl From<FlowSnapshot> for FlowView {
    fn from(snapshot: FlowSnapshot) -> Self {
        let tokens = snapshot.tokens;
        Self {
            flow_state: snapshot.flow_state,
            has_authorization_code: tokens.authorization_code.is_some(),
            has_access_token: tokens.access_token.is_some(),
            has_id_token: tokens.id_token.is_some(),
            has_refresh_token: tokens.refresh_token.is_some(),
            introspection_result: tokens.introspection_result,
            user_info: tokens.user_info,
        }
    }
}

/// What a protected page shows about the verified caller.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrivateView {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
}

impl PrivateView {
    pub fn new(path: &str, claims: &AccessClaims) -> Self {
        Self {
            path: path.to_string(),
            sub: claims.sub.clone(),
            preferred_username: claims.preferred_username.clone(),
        }
    }
}
