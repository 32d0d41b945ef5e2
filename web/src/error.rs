use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{DomainErrorKind, Error as DomainError, FlowErrorKind};
use domain::oauth_flow::Destination;
use log::*;

use crate::controller::found;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    /// Where the browser goes when a flow step fails. `None` for failures that
    /// no redirect can recover from.
    fn destination(&self) -> Option<Destination> {
        match &self.0.error_kind {
            DomainErrorKind::Internal(_) => None,
            DomainErrorKind::Flow(FlowErrorKind::Precondition(_)) => Some(Destination::Login),
            DomainErrorKind::Flow(_)
            | DomainErrorKind::External(_)
            | DomainErrorKind::Verification(_) => Some(Destination::Home),
        }
    }
}

// Flow failures never produce an error body.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.destination() {
            Some(destination) => {
                debug!(
                    "Redirecting to {} after {:?}",
                    destination.location(),
                    self.0.error_kind
                );
                found(destination.location())
            }
            None => {
                error!("Internal error while handling request: {:?}", self.0);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;
    use domain::error::{ExternalErrorKind, InternalErrorKind, Precondition, VerificationErrorKind};

    fn response_for(error_kind: DomainErrorKind) -> Response {
        Error(DomainError {
            source: None,
            error_kind,
        })
        .into_response()
    }

    fn location(response: &Response) -> &str {
        response.headers()[LOCATION].to_str().unwrap()
    }

    #[test]
    fn test_precondition_errors_redirect_to_login() {
        let response = response_for(DomainErrorKind::Flow(FlowErrorKind::Precondition(
            Precondition::AccessToken,
        )));
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/login");
    }

    #[test]
    fn test_remote_and_verification_errors_redirect_home() {
        for kind in [
            DomainErrorKind::External(ExternalErrorKind::TokenExchange),
            DomainErrorKind::External(ExternalErrorKind::Logout),
            DomainErrorKind::Flow(FlowErrorKind::InvalidState),
            DomainErrorKind::Flow(FlowErrorKind::Superseded),
            DomainErrorKind::Verification(VerificationErrorKind::Expired),
        ] {
            let response = response_for(kind);
            assert_eq!(response.status(), StatusCode::FOUND);
            assert_eq!(location(&response), "/");
        }
    }

    #[test]
    fn test_internal_errors_are_server_errors() {
        let response = response_for(DomainErrorKind::Internal(InternalErrorKind::Config));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
