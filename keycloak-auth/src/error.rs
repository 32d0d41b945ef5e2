//! Error types for the `keycloak-auth` crate.
//!
//! Follows the same pattern as domain::error with a root Error struct and error kind enums.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for keycloak-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in keycloak-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    OAuth(OAuthErrorKind),
    Http(HttpErrorKind),
}

/// Errors from the remote openid-connect calls, one kind per operation.
///
/// Every kind covers the three ways a remote call can fail: a network failure
/// (including timeouts), a non-2xx status, or a body that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OAuthErrorKind {
    TokenExchangeFailed,
    TokenRefreshFailed,
    IntrospectionFailed,
    UserInfoFailed,
    LogoutFailed,
}

/// Errors setting up the HTTP client, before any request is sent.
#[derive(Debug, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::OAuth(kind) => write!(f, "OAuth error: {:?}", kind),
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// Only client construction converts directly; request failures go through
// `oauth_error_from` so they carry the operation.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Http(HttpErrorKind::BuilderFailed),
        }
    }
}

/// Helper function to create OAuth errors.
pub fn oauth_error(kind: OAuthErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::OAuth(kind),
    }
}

/// Tags an underlying failure with the OAuth operation it interrupted.
pub fn oauth_error_from<E>(kind: OAuthErrorKind, err: E) -> Error
where
    E: StdError + Send + Sync + 'static,
{
    Error {
        source: Some(Box::new(err)),
        error_kind: ErrorKind::OAuth(kind),
    }
}
