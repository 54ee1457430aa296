//! Access gate contract and identity-provider key material.
//!
//! The workflow core never inspects credentials. Transport middleware calls
//! [`AccessGate::authenticate`] and hands the engine an opaque
//! [`Principal`] used only for audit attribution in traces. Signature,
//! issuer, audience, and expiry checks belong to whichever gate
//! implementation fronts the real identity provider.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Opaque caller identity supplied by the access gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(pub String);

impl Principal {
    /// Identity used when a router is mounted without auth middleware
    /// (tests and CLI demos).
    pub fn anonymous() -> Self {
        Self("anonymous".to_string())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("credential rejected")]
    Unauthorized,
}

pub trait AccessGate: Send + Sync {
    fn authenticate(&self, credential: &str) -> Result<Principal, AuthError>;
}

/// Token-to-principal map for local serving and tests.
#[derive(Debug, Default)]
pub struct StaticTokenGate {
    tokens: HashMap<String, String>,
}

impl StaticTokenGate {
    pub fn with_token(mut self, token: impl Into<String>, principal: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), principal.into());
        self
    }
}

impl AccessGate for StaticTokenGate {
    fn authenticate(&self, credential: &str) -> Result<Principal, AuthError> {
        self.tokens
            .get(credential)
            .map(|name| Principal(name.clone()))
            .ok_or(AuthError::Unauthorized)
    }
}

/// One verification key published by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationKey {
    pub kid: String,
    pub material: String,
}

/// Process-wide cache of identity-provider verification keys.
///
/// The cache is constructed explicitly at startup and replaced explicitly
/// via [`KeyCache::refresh`]; there is no lazy first-call population.
/// Staleness is a configured policy (`max_age`), checked by the owner
/// rather than inside the authentication path.
pub struct KeyCache {
    max_age: Duration,
    inner: RwLock<KeySet>,
}

struct KeySet {
    keys: Vec<VerificationKey>,
    fetched_at: DateTime<Utc>,
}

impl KeyCache {
    pub fn new(max_age: Duration, initial: Vec<VerificationKey>) -> Self {
        Self {
            max_age,
            inner: RwLock::new(KeySet {
                keys: initial,
                fetched_at: Utc::now(),
            }),
        }
    }

    pub fn keys(&self) -> Vec<VerificationKey> {
        let guard = self.inner.read().expect("key cache lock poisoned");
        guard.keys.clone()
    }

    pub fn find(&self, kid: &str) -> Option<VerificationKey> {
        let guard = self.inner.read().expect("key cache lock poisoned");
        guard.keys.iter().find(|key| key.kid == kid).cloned()
    }

    /// Replace the cached key set and reset its age.
    pub fn refresh(&self, keys: Vec<VerificationKey>) {
        let mut guard = self.inner.write().expect("key cache lock poisoned");
        guard.keys = keys;
        guard.fetched_at = Utc::now();
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        let guard = self.inner.read().expect("key cache lock poisoned");
        now - guard.fetched_at > self.max_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(kid: &str) -> VerificationKey {
        VerificationKey {
            kid: kid.to_string(),
            material: format!("pem::{kid}"),
        }
    }

    #[test]
    fn static_gate_maps_tokens_to_principals() {
        let gate = StaticTokenGate::default().with_token("tok-1", "hr-ops");
        let principal = gate.authenticate("tok-1").expect("token accepted");
        assert_eq!(principal, Principal("hr-ops".to_string()));
    }

    #[test]
    fn static_gate_rejects_unknown_tokens() {
        let gate = StaticTokenGate::default().with_token("tok-1", "hr-ops");
        assert!(matches!(
            gate.authenticate("tok-2"),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn cache_is_fresh_after_construction() {
        let cache = KeyCache::new(Duration::seconds(300), vec![key("a")]);
        assert!(!cache.is_stale(Utc::now()));
        assert_eq!(cache.keys().len(), 1);
    }

    #[test]
    fn cache_goes_stale_past_max_age() {
        let cache = KeyCache::new(Duration::seconds(300), vec![key("a")]);
        let later = Utc::now() + Duration::seconds(301);
        assert!(cache.is_stale(later));
    }

    #[test]
    fn refresh_replaces_keys_and_resets_age() {
        let cache = KeyCache::new(Duration::seconds(300), vec![key("a")]);
        cache.refresh(vec![key("b"), key("c")]);

        assert!(!cache.is_stale(Utc::now()));
        assert!(cache.find("a").is_none());
        assert_eq!(cache.find("b").expect("key present").kid, "b");
        assert_eq!(cache.keys().len(), 2);
    }
}
