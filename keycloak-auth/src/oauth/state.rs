//! CSRF state management for the login redirect.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// State data stored while the browser is away at the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct StateData {
    /// Local path to resume at after the callback.
    pub redirect_target: String,
    /// When this state expires.
    pub expires_at: DateTime<Utc>,
}

/// Manager for OAuth state parameters with expiration.
///
/// Issues unguessable, single-use state tokens so a callback can only complete a
/// login this process started. The redirect target never travels through the
/// browser; only the token does.
#[derive(Clone)]
pub struct StateManager {
    states: Arc<Mutex<HashMap<String, StateData>>>,
    ttl: Duration,
}

impl StateManager {
    /// Create a new state manager with default TTL of 10 minutes.
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(10))
    }

    /// Create a new state manager with custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            states: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StateData>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Generate a new state token bound to `redirect_target`.
    ///
    /// Expired entries are purged on every call, which keeps the table bounded by
    /// the number of logins started within one TTL.
    pub fn generate(&self, redirect_target: &str) -> String {
        let state = Self::generate_token();
        let now = Utc::now();

        let data = StateData {
            redirect_target: redirect_target.to_string(),
            expires_at: now + self.ttl,
        };

        let mut states = self.lock();
        states.retain(|_, data| data.expires_at > now);
        states.insert(state.clone(), data);

        state
    }

    /// Validate and consume a state token.
    ///
    /// Returns `None` for unknown, already consumed, or expired tokens.
    pub fn validate(&self, state: &str) -> Option<StateData> {
        let data = self.lock().remove(state)?;
        if Utc::now() > data.expires_at {
            return None;
        }
        Some(data)
    }

    /// Number of unexpired logins waiting for their callback.
    pub fn pending(&self) -> usize {
        let now = Utc::now();
        self.lock()
            .values()
            .filter(|data| data.expires_at > now)
            .count()
    }

    /// Generate a cryptographically random state token.
    fn generate_token() -> String {
        let random_bytes: [u8; 32] = rand::thread_rng().gen();
        hex::encode(random_bytes)
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}
