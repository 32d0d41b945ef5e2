//! Controller for the authorization code flow.
//!
//! Every endpoint here is reached by a browser navigation and answers with a
//! `302 Found`. Failures redirect too, see [`crate::Error`].

use crate::controller::found;
use crate::params::oauth::{CallbackParams, LoginParams};
use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use domain::oauth_flow;
use log::*;

/// GET /login
///
/// Starts the flow by redirecting to the provider's authorization endpoint.
#[utoipa::path(
    get,
    path = "/login",
    params(LoginParams),
    responses(
        (status = 302, description = "Redirect to the Keycloak login page"),
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> impl IntoResponse {
    let destination = oauth_flow::initiate_login(
        app_state.provider(),
        &app_state.login_states,
        params.redirect.as_deref(),
    );
    found(destination.location())
}

/// GET /callback
///
/// Receives the authorization code from the provider.
#[utoipa::path(
    get,
    path = "/callback",
    params(CallbackParams),
    responses(
        (status = 302, description = "Redirect to the page the login started from, or home"),
    )
)]
pub async fn callback(
    State(app_state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, Error> {
    if let Some(error) = &params.error {
        warn!(
            "Provider refused authorization: {} {}",
            error,
            params.error_description.as_deref().unwrap_or_default()
        );
    }

    let destination = oauth_flow::handle_callback(
        &app_state.token_store,
        &app_state.login_states,
        params.code.as_deref(),
        params.state.as_deref(),
    )?;
    Ok(found(destination.location()))
}

/// GET /exchange-token
///
/// Trades the stored authorization code for tokens.
#[utoipa::path(
    get,
    path = "/exchange-token",
    responses(
        (status = 302, description = "Redirect home; the outcome shows in the token store"),
    )
)]
pub async fn exchange_token(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let destination =
        oauth_flow::exchange_token(&app_state.token_store, app_state.provider()).await?;
    Ok(found(destination.location()))
}

/// GET /introspect
///
/// Asks the provider about the stored access token.
#[utoipa::path(
    get,
    path = "/introspect",
    responses(
        (status = 302, description = "Redirect home with the introspection result stored"),
    )
)]
pub async fn introspect(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let destination = oauth_flow::introspect(&app_state.token_store, app_state.provider()).await?;
    Ok(found(destination.location()))
}

/// GET /user-info
///
/// Fetches the user info for the stored access token.
#[utoipa::path(
    get,
    path = "/user-info",
    responses(
        (status = 302, description = "Redirect home with the user info stored"),
    )
)]
pub async fn user_info(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let destination =
        oauth_flow::fetch_user_info(&app_state.token_store, app_state.provider()).await?;
    Ok(found(destination.location()))
}

/// GET /refresh
///
/// Obtains fresh tokens with the stored refresh token.
#[utoipa::path(
    get,
    path = "/refresh",
    responses(
        (status = 302, description = "Redirect home with the refreshed tokens stored"),
    )
)]
pub async fn refresh(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let destination = oauth_flow::refresh(&app_state.token_store, app_state.provider()).await?;
    Ok(found(destination.location()))
}

/// GET /logout
///
/// Ends the provider session and clears the token store.
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 302, description = "Redirect home with an empty token store"),
    )
)]
pub async fn logout(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let destination = oauth_flow::logout(&app_state.token_store, app_state.provider()).await?;
    Ok(found(destination.location()))
}
