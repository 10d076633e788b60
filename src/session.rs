use serde::{Deserialize, Serialize};

/// Bearer + refresh credential pair returned by the login exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Explicit session context passed to every store operation. Lifecycle:
/// absent -> acquired at login -> cleared at logout. Never a hidden global.
#[derive(Debug, Default)]
pub struct Session {
    tokens: Option<TokenPair>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    pub fn accept(&mut self, tokens: TokenPair) {
        self.tokens = Some(tokens);
    }

    /// Logout: drops both the bearer and the refresh credential.
    pub fn clear(&mut self) {
        self.tokens = None;
    }

    pub fn bearer(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access.as_str())
    }
}
