//! In-memory store for the values the authorization code flow accumulates.
//!
//! One store is shared by every request handler. All six values live behind a
//! single lock, so a reader sees either the state before a write or the state
//! after it, never a mix. In particular [`TokenStore::clear`] is atomic with
//! respect to [`TokenStore::get_all`].
//!
//! ```rust,ignore
//! use domain::token_store::{AccessToken, TokenStore};
//!
//! let store = TokenStore::new();
//! store.set(AccessToken, "eyJ...".to_string());
//! assert_eq!(store.get(AccessToken).as_deref(), Some("eyJ..."));
//! ```

use crate::JsonObject;
use std::sync::{Arc, PoisonError, RwLock};

/// Every value the flow may hold at one time. All fields start out absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenState {
    pub authorization_code: Option<String>,
    pub access_token: Option<String>,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    pub introspection_result: Option<JsonObject>,
    pub user_info: Option<JsonObject>,
    /// Set once the current authorization code has been traded for tokens.
    /// Reset whenever a new code is stored.
    pub code_exchanged: bool,
}

impl TokenState {
    pub fn is_empty(&self) -> bool {
        *self == TokenState::default()
    }
}

/// A named slot in [`TokenState`], carrying the type of value it holds.
pub trait TokenKey: Copy + std::fmt::Debug {
    type Value: Clone;

    fn slot(state: &TokenState) -> &Option<Self::Value>;
    fn slot_mut(state: &mut TokenState) -> &mut Option<Self::Value>;
}

macro_rules! token_key {
    ($(#[$doc:meta])* $name:ident => $field:ident: $value:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl TokenKey for $name {
            type Value = $value;

            fn slot(state: &TokenState) -> &Option<$value> {
                &state.$field
            }

            fn slot_mut(state: &mut TokenState) -> &mut Option<$value> {
                &mut state.$field
            }
        }
    };
}

token_key!(
    /// The code delivered to the callback.
    AuthorizationCode => authorization_code: String
);
token_key!(AccessToken => access_token: String);
token_key!(IdToken => id_token: String);
token_key!(RefreshToken => refresh_token: String);
token_key!(
    /// The provider's report on the current access token.
    IntrospectionResult => introspection_result: JsonObject
);
token_key!(UserInfo => user_info: JsonObject);

/// Shared handle to the token state. Cloning shares the same underlying state.
#[derive(Clone, Debug, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<TokenState>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`, if any.
    pub fn get<K: TokenKey>(&self, _key: K) -> Option<K::Value> {
        self.read(|state| K::slot(state).clone())
    }

    /// Stores `value` under `key`, replacing whatever was there.
    pub fn set<K: TokenKey>(&self, _key: K, value: K::Value) {
        self.update(|state| *K::slot_mut(state) = Some(value));
    }

    /// Returns a consistent copy of every stored value.
    pub fn get_all(&self) -> TokenState {
        self.read(TokenState::clone)
    }

    /// Resets every value to absent in one step.
    pub fn clear(&self) {
        self.update(|state| *state = TokenState::default());
    }

    /// Runs `f` against the state under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&TokenState) -> R) -> R {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Runs `f` against the state under the write lock. Every change `f` makes
    /// becomes visible to readers at once.
    pub fn update<R>(&self, f: impl FnOnce(&mut TokenState) -> R) -> R {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}
