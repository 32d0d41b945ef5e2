use crate::extractors::RejectionType;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use domain::jwt::AccessClaims;
use log::*;

/// The claims of the access token the guard verified for this request.
pub(crate) struct AuthenticatedClaims(pub AccessClaims);

impl<S> FromRequestParts<S> for AuthenticatedClaims
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    // The guard in `protect::private` inserts the claims into the request
    // extensions after verifying the token. A handler outside the guard gets a 401.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AccessClaims>() {
            Some(claims) => Ok(AuthenticatedClaims(claims.clone())),
            None => {
                warn!("No verified claims for {}", parts.uri.path());
                Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_extracts_claims_from_extensions() {
        let claims = AccessClaims {
            sub: Some("user-1".to_string()),
            ..Default::default()
        };
        let (mut parts, _) = Request::builder()
            .uri("/private/")
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(claims.clone());

        let AuthenticatedClaims(extracted) =
            AuthenticatedClaims::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(extracted, claims);
    }

    #[tokio::test]
    async fn test_rejects_request_without_claims() {
        let (mut parts, _) = Request::builder()
            .uri("/private/")
            .body(())
            .unwrap()
            .into_parts();

        let rejection = AuthenticatedClaims::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();

        assert_eq!(rejection.0, StatusCode::UNAUTHORIZED);
    }
}
