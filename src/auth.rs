//! Session token store
//!
//! A process-scoped, explicitly owned registry of admin session tokens.
//! The store is a handle (cheap to clone, internally Arc-shared) passed into
//! request-handling tasks via the API state; there is no global access.

use rand::{Rng, distributions::Alphanumeric};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Length of generated session tokens
const TOKEN_LENGTH: usize = 48;

/// In-memory session token registry
///
/// Tokens are issued at login, checked by the admin middleware, and removed
/// at logout. All tokens vanish on process restart, which also serves as a
/// global session revocation.
#[derive(Clone, Debug, Default)]
pub struct TokenStore {
    tokens: Arc<RwLock<HashSet<String>>>,
}

impl TokenStore {
    /// Create an empty token store
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new random token value without storing it
    pub fn generate() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Generate, store, and return a fresh session token
    pub async fn issue(&self) -> String {
        let token = Self::generate();
        self.tokens.write().await.insert(token.clone());
        token
    }

    /// Check whether a token is currently valid
    pub async fn verify(&self, token: &str) -> bool {
        self.tokens.read().await.contains(token)
    }

    /// Remove a token, returning whether it existed
    pub async fn remove(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token)
    }

    /// Remove all tokens
    pub async fn clear(&self) {
        self.tokens.write().await.clear();
    }

    /// Number of active sessions
    pub async fn active_sessions(&self) -> usize {
        self.tokens.read().await.len()
    }
}
