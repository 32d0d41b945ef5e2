//! Error types for the `domain` layer.
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use keycloak_auth::error::{
    Error as KeycloakAuthError, ErrorKind as KeycloakAuthErrorKind, HttpErrorKind, OAuthErrorKind,
};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. Ex. `domain` is dependent on `keycloak-auth`, and `web` is dependent on
/// `domain`, but `web` should not be dependent, directly, on `keycloak-auth`. Ultimately the
/// various `error_kind`s are used by `web` to pick where the browser is sent next.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Flow(FlowErrorKind),
    Verification(VerificationErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Config,
    Other(String),
}

/// Failures of a remote call to the identity provider, one kind per operation.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    TokenExchange,
    TokenRefresh,
    Introspection,
    UserInfo,
    Logout,
}

/// Errors raised by the flow steps themselves, before or after a remote call.
#[derive(Debug, PartialEq)]
pub enum FlowErrorKind {
    /// A step was attempted without the value it needs in the token store.
    Precondition(Precondition),
    /// The callback carried a state parameter this process never issued, or one
    /// that expired or was already used.
    InvalidState,
    /// The store changed while a remote call was in flight, so its result was dropped.
    Superseded,
}

/// The stored value a flow step was missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precondition {
    AuthorizationCode,
    AccessToken,
    RefreshToken,
}

/// Reasons an access token failed verification at the guard.
#[derive(Debug, PartialEq)]
pub enum VerificationErrorKind {
    InvalidSignature,
    Expired,
    NotYetValid,
    UnsupportedAlgorithm,
    Malformed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl Error {
    pub(crate) fn precondition(missing: Precondition) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Flow(FlowErrorKind::Precondition(missing)),
        }
    }

    pub(crate) fn flow(kind: FlowErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Flow(kind),
        }
    }

    pub(crate) fn config(message: &str) -> Self {
        Error {
            source: Some(message.to_string().into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    }
}

// This is where we translate errors from the `keycloak-auth` layer to the `domain` layer.
impl From<KeycloakAuthError> for Error {
    fn from(err: KeycloakAuthError) -> Self {
        let error_kind = match &err.error_kind {
            KeycloakAuthErrorKind::OAuth(kind) => DomainErrorKind::External(match kind {
                OAuthErrorKind::TokenExchangeFailed => ExternalErrorKind::TokenExchange,
                OAuthErrorKind::TokenRefreshFailed => ExternalErrorKind::TokenRefresh,
                OAuthErrorKind::IntrospectionFailed => ExternalErrorKind::Introspection,
                OAuthErrorKind::UserInfoFailed => ExternalErrorKind::UserInfo,
                OAuthErrorKind::LogoutFailed => ExternalErrorKind::Logout,
            }),
            // Builder failures happen before any network call is made.
            KeycloakAuthErrorKind::Http(HttpErrorKind::BuilderFailed) => {
                DomainErrorKind::Internal(InternalErrorKind::Other(err.to_string()))
            }
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<JwtError> for Error {
    fn from(err: JwtError) -> Self {
        let kind = match err.kind() {
            JwtErrorKind::InvalidSignature => VerificationErrorKind::InvalidSignature,
            JwtErrorKind::ExpiredSignature => VerificationErrorKind::Expired,
            JwtErrorKind::ImmatureSignature => VerificationErrorKind::NotYetValid,
            JwtErrorKind::InvalidAlgorithm
            | JwtErrorKind::InvalidAlgorithmName
            | JwtErrorKind::MissingAlgorithm => VerificationErrorKind::UnsupportedAlgorithm,
            _ => VerificationErrorKind::Malformed,
        };
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Verification(kind),
        }
    }
}
