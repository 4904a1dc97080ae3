//! Authentication capability consulted by gated fetchers.
//!
//! The session is passed in explicitly so callers and tests can substitute
//! their own notion of "logged in".

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub trait Session: Send + Sync {
    fn is_logged_in(&self) -> bool;

    fn bearer_token(&self) -> Option<&str> {
        None
    }
}

/// Fixed answer, for anonymous use and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticSession(pub bool);

impl Session for StaticSession {
    fn is_logged_in(&self) -> bool {
        self.0
    }
}

/// Claims read from the JWT payload. The backend signs `fullName` and `sub`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub sub: Option<String>,
    pub full_name: Option<String>,
    pub user_id: Option<i64>,
    pub exp: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct TokenSession {
    token: Option<String>,
}

impl TokenSession {
    pub fn new(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty());
        Self { token }
    }

    /// Decodes the payload segment without verifying the signature.
    pub fn claims(&self) -> Option<TokenClaims> {
        let token = self.token.as_deref()?;
        let payload = token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// No token or an unreadable one counts as expired; a token without `exp` never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_none() {
            return true;
        }
        let Some(claims) = self.claims() else {
            return true;
        };
        match claims.exp {
            Some(exp) => now.timestamp() >= exp,
            None => false,
        }
    }
}

impl Session for TokenSession {
    fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
