//! The access guard for the `/private` tree.
use crate::controller::found;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use domain::oauth_flow::Destination;
use domain::redirect;
use domain::token_store::AccessToken;
use log::*;

/// Admits the request only if the token store holds an access token that
/// verifies against the realm public key.
///
/// Without a token the browser is sent to log in and come back to the path it
/// asked for. A token that fails verification sends the browser home. On
/// success the verified claims are inserted into the request extensions.
/// Intended to be given to axum::middleware::from_fn_with_state in the router
pub(crate) async fn require_access_token(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(access_token) = app_state.token_store.get(AccessToken) else {
        let target = redirect::resume_target(request.uri().path());
        debug!("No access token for {}; starting login", request.uri().path());
        return found(&redirect::login_location(&target));
    };

    match app_state.verifier().verify(&access_token) {
        Ok(claims) => {
            trace!("Admitting {} for subject {:?}", request.uri().path(), claims.sub);
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            warn!(
                "Rejected access token for {}: {:?}",
                request.uri().path(),
                e.error_kind
            );
            found(Destination::Home.location())
        }
    }
}
