//! Claims carried by realm access tokens.
//!
//! Only the registered claims are typed; everything else the realm adds
//! (`realm_access`, `resource_access`, custom mappers) is kept in `extra`.

use crate::JsonObject;
use serde::{Deserialize, Serialize};

/// The verified contents of an access token.
///
/// Every registered claim is optional: the guard requires none of them, and
/// only checks `exp` and `nbf` when they are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}
