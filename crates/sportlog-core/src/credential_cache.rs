//! Single-slot cache for a short-lived bearer token.
//!
//! The cache never fetches anything itself. A caller reads with
//! [`CredentialCache::get`]; on `None` it authenticates against the upstream
//! service and stores the fresh token with [`CredentialCache::set`].
//!
//! Tokens are kept for [`TOKEN_TTL_SECS`], which is shorter than the upstream
//! lifetime so a token never expires while a request is in flight.
//!
//! Concurrent callers may both miss and both refresh; the last `set` wins.
//! Any valid token works for any caller, so this race is harmless.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::clock::{Clock, SystemClock};

/// Seconds a cached token stays usable after `set`.
pub const TOKEN_TTL_SECS: i64 = 3500;

/// A token and the instant it stops being usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    /// The bearer token.
    pub value: String,
    /// First instant at which the token is treated as absent.
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Whether the token is still usable at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// In-memory, time-bounded holder of one bearer token.
///
/// The value and its expiry share one lock, so readers never observe a token
/// from one refresh paired with the expiry of another.
pub struct CredentialCache<C: Clock = SystemClock> {
    slot: RwLock<Option<CachedToken>>,
    clock: C,
    ttl: Duration,
}

impl CredentialCache<SystemClock> {
    /// Empty cache on the wall clock with the default TTL.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for CredentialCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> CredentialCache<C> {
    /// Empty cache on a custom clock with the default TTL.
    pub fn with_clock(clock: C) -> Self {
        Self::with_ttl(clock, Duration::seconds(TOKEN_TTL_SECS))
    }

    /// Empty cache on a custom clock and TTL.
    pub fn with_ttl(clock: C, ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            clock,
            ttl,
        }
    }

    /// The cached token, if one was set and has not expired.
    pub fn get(&self) -> Option<String> {
        let now = self.clock.now();
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        match slot.as_ref() {
            Some(token) if token.is_valid_at(now) => {
                debug!(expires_at = %token.expires_at, "Credential cache hit");
                Some(token.value.clone())
            }
            Some(_) => {
                debug!("Cached credential expired");
                None
            }
            None => None,
        }
    }

    /// Store a fresh token, replacing whatever was there.
    pub fn set(&self, token: impl Into<String>) {
        let expires_at = self.clock.now() + self.ttl;
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(CachedToken {
            value: token.into(),
            expires_at,
        });
        debug!(expires_at = %expires_at, "Credential cached");
    }

    /// Expiry of the stored token, valid or not.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|t| t.expires_at)
    }
}
