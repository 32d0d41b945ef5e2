//! The steps of the OAuth2 Authorization Code flow.
//!
//! Each step reads what it needs from the [`TokenStore`], talks to the
//! identity provider through the [`Provider`] trait, and commits the result back
//! to the store. No lock is held while a remote call is in flight; results are
//! committed only if the value they were obtained with is still current, so a
//! concurrent logout or a newer login is never overwritten by a stale response.
//!
//! Every step returns the [`Destination`] the browser should be sent to next.

use crate::error::{Error, FlowErrorKind, Precondition};
use crate::gateway::oauth::{Provider, StateManager};
use crate::redirect;
use crate::token_store::{
    AccessToken, IntrospectionResult, RefreshToken, TokenKey, TokenState, TokenStore, UserInfo,
};
use log::*;
use serde::Serialize;

/// Where the browser goes after a flow step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The home view, `/`.
    Home,
    /// The start of the flow, `/login`.
    Login,
    /// A validated local path the login was started from.
    Resume(String),
    /// The provider's authorization endpoint.
    Provider(String),
}

impl Destination {
    pub fn location(&self) -> &str {
        match self {
            Destination::Home => "/",
            Destination::Login => "/login",
            Destination::Resume(path) => path,
            Destination::Provider(url) => url,
        }
    }
}

/// How far the flow has progressed, derived from what the store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Anonymous,
    Authorizing,
    CodeReceived,
    Authenticated,
}

/// A consistent view of the flow for display.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSnapshot {
    pub flow_state: FlowState,
    pub tokens: TokenState,
}

/// Reads the store once and derives the flow state from that single copy.
pub fn snapshot(store: &TokenStore, states: &StateManager) -> FlowSnapshot {
    let tokens = store.get_all();
    let flow_state = if tokens.access_token.is_some() {
        FlowState::Authenticated
    } else if tokens.authorization_code.is_some() && !tokens.code_exchanged {
        FlowState::CodeReceived
    } else if states.pending() > 0 {
        FlowState::Authorizing
    } else {
        FlowState::Anonymous
    };

    FlowSnapshot { flow_state, tokens }
}

pub fn flow_state(store: &TokenStore, states: &StateManager) -> FlowState {
    snapshot(store, states).flow_state
}

/// Starts a login. The (validated) target is bound to a fresh state token that
/// travels to the provider and back; unsafe targets resume at `/`.
pub fn initiate_login(
    provider: &dyn Provider,
    states: &StateManager,
    desired_target: Option<&str>,
) -> Destination {
    let target = desired_target
        .and_then(redirect::validate)
        .unwrap_or_else(|| "/".to_string());

    let state = states.generate(&target);
    let request = provider.authorization_url(&state);

    debug!("Starting login, resuming at {} afterwards", target);
    Destination::Provider(request.url)
}

/// Accepts the provider's redirect back to `/callback`.
///
/// A present `state` must be one this process issued and not yet used; if it
/// is not, the code is discarded. Without a `state` the code is still stored
/// and the browser goes home.
pub fn handle_callback(
    store: &TokenStore,
    states: &StateManager,
    code: Option<&str>,
    state: Option<&str>,
) -> Result<Destination, Error> {
    let code = code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| {
            warn!("Callback arrived without an authorization code");
            Error::precondition(Precondition::AuthorizationCode)
        })?;

    let destination = match state.filter(|state| !state.is_empty()) {
        None => Destination::Home,
        Some(state) => {
            let data = states.validate(state).ok_or_else(|| {
                warn!("Callback carried an unknown, expired or reused state");
                Error::flow(FlowErrorKind::InvalidState)
            })?;
            redirect::validate(&data.redirect_target)
                .map(Destination::Resume)
                .unwrap_or(Destination::Home)
        }
    };

    store.update(|tokens| {
        tokens.authorization_code = Some(code.to_string());
        tokens.code_exchanged = false;
    });

    info!("Stored authorization code from callback");
    Ok(destination)
}

/// Trades the stored authorization code for tokens.
///
/// A code is exchanged at most once. The tokens are committed only if the
/// store still holds the same unexchanged code when the provider answers.
pub async fn exchange_token(
    store: &TokenStore,
    provider: &dyn Provider,
) -> Result<Destination, Error> {
    let code = store
        .read(|tokens| {
            if tokens.code_exchanged {
                None
            } else {
                tokens.authorization_code.clone()
            }
        })
        .ok_or_else(|| {
            warn!("No unexchanged authorization code to trade for tokens");
            Error::precondition(Precondition::AuthorizationCode)
        })?;

    let tokens = provider
        .exchange_code(&code)
        .await
        .inspect_err(|e| warn!("Failed to exchange authorization code: {:?}", e))?
        .into_plain();

    let committed = store.update(|state| {
        if state.code_exchanged || state.authorization_code.as_deref() != Some(code.as_str()) {
            return false;
        }
        state.access_token = Some(tokens.access_token);
        state.id_token = tokens.id_token;
        state.refresh_token = tokens.refresh_token;
        state.code_exchanged = true;
        true
    });

    if !committed {
        warn!("Token store changed during code exchange; dropping the new tokens");
        return Err(Error::flow(FlowErrorKind::Superseded));
    }

    info!("Exchanged authorization code for tokens");
    Ok(Destination::Home)
}

/// Obtains fresh tokens with the stored refresh token. A refresh token in the
/// response replaces the stored one; otherwise the stored one is kept.
pub async fn refresh(store: &TokenStore, provider: &dyn Provider) -> Result<Destination, Error> {
    let refresh_token = require(store, RefreshToken, Precondition::RefreshToken)?;

    let tokens = provider
        .refresh_token(&refresh_token)
        .await
        .inspect_err(|e| warn!("Failed to refresh tokens: {:?}", e))?
        .into_plain();

    let committed = store.update(|state| {
        if state.refresh_token.as_deref() != Some(refresh_token.as_str()) {
            return false;
        }
        state.access_token = Some(tokens.access_token);
        if tokens.id_token.is_some() {
            state.id_token = tokens.id_token;
        }
        if tokens.refresh_token.is_some() {
            state.refresh_token = tokens.refresh_token;
        }
        true
    });

    if !committed {
        warn!("Token store changed during refresh; dropping the new tokens");
        return Err(Error::flow(FlowErrorKind::Superseded));
    }

    info!("Refreshed tokens");
    Ok(Destination::Home)
}

/// Asks the provider about the stored access token and stores its report.
pub async fn introspect(store: &TokenStore, provider: &dyn Provider) -> Result<Destination, Error> {
    let access_token = require(store, AccessToken, Precondition::AccessToken)?;

    let result = provider
        .introspect(&access_token)
        .await
        .inspect_err(|e| warn!("Failed to introspect access token: {:?}", e))?;

    commit_for_access_token(store, &access_token, IntrospectionResult, result)?;
    Ok(Destination::Home)
}

/// Fetches the user info for the stored access token and stores it.
pub async fn fetch_user_info(
    store: &TokenStore,
    provider: &dyn Provider,
) -> Result<Destination, Error> {
    let access_token = require(store, AccessToken, Precondition::AccessToken)?;

    let user_info = provider
        .get_user_info(&access_token)
        .await
        .inspect_err(|e| warn!("Failed to fetch user info: {:?}", e))?;

    commit_for_access_token(store, &access_token, UserInfo, user_info)?;
    Ok(Destination::Home)
}

/// Ends the provider session, then clears every stored value. When the
/// provider call fails the store is left untouched.
pub async fn logout(store: &TokenStore, provider: &dyn Provider) -> Result<Destination, Error> {
    let refresh_token = require(store, RefreshToken, Precondition::RefreshToken)?;

    provider
        .logout(&refresh_token)
        .await
        .inspect_err(|e| warn!("Failed to log out at the provider: {:?}", e))?;

    store.clear();
    info!("Logged out and cleared the token store");
    Ok(Destination::Home)
}

fn require<K>(store: &TokenStore, key: K, missing: Precondition) -> Result<String, Error>
where
    K: TokenKey<Value = String>,
{
    store.get(key).ok_or_else(|| {
        warn!("Flow step attempted without {:?}", missing);
        Error::precondition(missing)
    })
}

fn commit_for_access_token<K: TokenKey>(
    store: &TokenStore,
    access_token: &str,
    key: K,
    value: K::Value,
) -> Result<(), Error> {
    let committed = store.update(|state| {
        if state.access_token.as_deref() != Some(access_token) {
            return false;
        }
        *K::slot_mut(state) = Some(value);
        true
    });

    if committed {
        Ok(())
    } else {
        warn!("Access token changed while {:?} was in flight; dropping result", key);
        Err(Error::flow(FlowErrorKind::Superseded))
    }
}
