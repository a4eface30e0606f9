//! Shared token state: refresh token entries and the access token revocation set.
//!
//! Both maps live behind one mutex. Every compound check-then-mutate sequence
//! (rotation, purge-on-read) runs inside a single critical section, so two
//! concurrent refreshes of the same token cannot both succeed.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use gatehouse_core::types::Principal;

use crate::error::Rejection;

/// Whether a refresh token may still be exchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    /// Usable.
    Active,
    /// Rotated out by a later refresh; kept until expiry so reuse is reported distinctly.
    Superseded,
}

/// Server-side record of an issued refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshEntry {
    /// Owner of the token.
    pub principal: Principal,
    /// Session the token belongs to; shared by every rotation of it.
    pub family: Uuid,
    /// Rotation count within the family (0 at login).
    pub generation: u32,
    /// Whether the long "remember me" lifetime applies.
    pub remember: bool,
    /// Issuance time.
    pub issued_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
    /// Current state.
    pub state: RefreshState,
}

impl RefreshEntry {
    /// Checks whether the entry has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Counts of entries removed by a purge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeStats {
    /// Refresh entries removed (active or superseded).
    pub refresh_removed: usize,
    /// Revocation entries removed.
    pub revocations_removed: usize,
}

impl PurgeStats {
    /// Total number of entries removed.
    pub fn total(&self) -> usize {
        self.refresh_removed + self.revocations_removed
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    /// SHA-256 of refresh token → entry.
    refresh: HashMap<String, RefreshEntry>,
    /// Revoked access token ID → original expiry.
    revoked: HashMap<Uuid, DateTime<Utc>>,
}

impl StoreInner {
    /// Looks up `key`, purging it if expired.
    fn check(&mut self, key: &str, now: DateTime<Utc>) -> Result<&mut RefreshEntry, Rejection> {
        let expired = match self.refresh.get(key) {
            None => return Err(Rejection::NotFound),
            Some(entry) => entry.is_expired_at(now),
        };

        if expired {
            self.refresh.remove(key);
            return Err(Rejection::Expired);
        }

        match self.refresh.get_mut(key) {
            Some(entry) if entry.state == RefreshState::Superseded => Err(Rejection::Superseded),
            Some(entry) => Ok(entry),
            None => Err(Rejection::NotFound),
        }
    }
}

/// In-process token store shared by every request.
#[derive(Debug, Default)]
pub struct TokenStore {
    inner: Mutex<StoreInner>,
}

impl TokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store key for a raw refresh token. Raw tokens are never kept.
    pub fn token_key(token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }

    /// Registers a refresh token.
    pub fn put_refresh(&self, token: &str, entry: RefreshEntry) {
        self.lock().refresh.insert(Self::token_key(token), entry);
    }

    /// Returns the raw entry for `token` without any validity checks.
    pub fn get_refresh(&self, token: &str) -> Option<RefreshEntry> {
        self.lock().refresh.get(&Self::token_key(token)).cloned()
    }

    /// Removes a refresh token. Returns whether it was present.
    pub fn delete_refresh(&self, token: &str) -> bool {
        self.lock().refresh.remove(&Self::token_key(token)).is_some()
    }

    /// Removes every refresh token of a session. Returns how many were removed.
    pub fn delete_family(&self, family: Uuid) -> usize {
        let mut inner = self.lock();
        let before = inner.refresh.len();
        inner.refresh.retain(|_, entry| entry.family != family);
        before - inner.refresh.len()
    }

    /// Looks up a refresh token for exchange.
    ///
    /// Absent → `NotFound`; expired → `Expired` (and the entry is removed);
    /// rotated out → `Superseded`.
    pub fn check_refresh(&self, token: &str, now: DateTime<Utc>) -> Result<RefreshEntry, Rejection> {
        let key = Self::token_key(token);
        self.lock().check(&key, now).map(|entry| entry.clone())
    }

    /// Atomically exchanges `old` for `new`.
    ///
    /// `successor` builds the new entry from the old one. The old entry is
    /// marked superseded and the new one inserted in the same critical section.
    /// If `successor` fails the old entry is left active.
    pub fn rotate_refresh<F, E>(
        &self,
        old: &str,
        new: &str,
        now: DateTime<Utc>,
        successor: F,
    ) -> Result<RefreshEntry, E>
    where
        F: FnOnce(&RefreshEntry) -> Result<RefreshEntry, E>,
        E: From<Rejection>,
    {
        let old_key = Self::token_key(old);
        let mut inner = self.lock();

        let entry = inner.check(&old_key, now)?;
        let next = successor(entry)?;
        entry.state = RefreshState::Superseded;

        inner.refresh.insert(Self::token_key(new), next.clone());
        Ok(next)
    }

    /// Adds an access token ID to the revocation set until `original_expiry`.
    pub fn revoke_access(&self, jti: Uuid, original_expiry: DateTime<Utc>) {
        self.lock().revoked.insert(jti, original_expiry);
    }

    /// Checks whether an access token ID is revoked.
    pub fn is_revoked(&self, jti: &Uuid) -> bool {
        self.lock().revoked.contains_key(jti)
    }

    /// Removes every refresh and revocation entry whose expiry is before `now`.
    ///
    /// Entries expiring at or after `now` are kept.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> PurgeStats {
        let mut inner = self.lock();

        let refresh_before = inner.refresh.len();
        inner.refresh.retain(|_, entry| !entry.is_expired_at(now));

        let revoked_before = inner.revoked.len();
        inner.revoked.retain(|_, expiry| *expiry >= now);

        let stats = PurgeStats {
            refresh_removed: refresh_before - inner.refresh.len(),
            revocations_removed: revoked_before - inner.revoked.len(),
        };

        if stats.total() > 0 {
            debug!(
                refresh_removed = stats.refresh_removed,
                revocations_removed = stats.revocations_removed,
                "Purged expired token state"
            );
        }

        stats
    }

    /// Number of refresh entries (active and superseded).
    pub fn refresh_count(&self) -> usize {
        self.lock().refresh.len()
    }

    /// Number of revoked access token IDs.
    pub fn revoked_count(&self) -> usize {
        self.lock().revoked.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;

    fn entry(expires_at: DateTime<Utc>) -> RefreshEntry {
        RefreshEntry {
            principal: Principal::new("admin", Vec::new()),
            family: Uuid::new_v4(),
            generation: 0,
            remember: false,
            issued_at: expires_at - Duration::days(1),
            expires_at,
            state: RefreshState::Active,
        }
    }

    fn same(old: &RefreshEntry) -> Result<RefreshEntry, Rejection> {
        Ok(old.clone())
    }

    #[test]
    fn test_keys_are_hashed() {
        let store = TokenStore::new();
        store.put_refresh("raw-token", entry(Utc::now() + Duration::hours(1)));

        let inner = store.lock();
        assert!(!inner.refresh.contains_key("raw-token"));
        assert!(inner.refresh.contains_key(&TokenStore::token_key("raw-token")));
    }

    #[test]
    fn test_check_missing_is_not_found() {
        let store = TokenStore::new();
        assert_eq!(
            store.check_refresh("nope", Utc::now()),
            Err(Rejection::NotFound)
        );
    }

    #[test]
    fn test_check_expired_purges_entry() {
        let store = TokenStore::new();
        let now = Utc::now();
        store.put_refresh("old", entry(now - Duration::hours(1)));

        assert_eq!(store.check_refresh("old", now), Err(Rejection::Expired));
        assert!(store.get_refresh("old").is_none());
        assert_eq!(store.check_refresh("old", now), Err(Rejection::NotFound));
    }

    #[test]
    fn test_rotation_supersedes_old_token() {
        let store = TokenStore::new();
        let now = Utc::now();
        let first = entry(now + Duration::days(1));
        store.put_refresh("r0", first.clone());

        let next = store
            .rotate_refresh("r0", "r1", now, |old| {
                Ok::<_, Rejection>(RefreshEntry {
                    generation: old.generation + 1,
                    ..old.clone()
                })
            })
            .unwrap();

        assert_eq!(next.generation, 1);
        assert_eq!(next.family, first.family);
        assert_eq!(store.check_refresh("r0", now), Err(Rejection::Superseded));
        assert!(store.check_refresh("r1", now).is_ok());
    }

    #[test]
    fn test_rotation_of_superseded_token_fails() {
        let store = TokenStore::new();
        let now = Utc::now();
        store.put_refresh("r0", entry(now + Duration::days(1)));
        store.rotate_refresh("r0", "r1", now, same).unwrap();

        let again = store.rotate_refresh("r0", "r2", now, same);
        assert_eq!(again, Err(Rejection::Superseded));
        assert!(store.get_refresh("r2").is_none());
    }

    #[test]
    fn test_failed_successor_leaves_token_active() {
        let store = TokenStore::new();
        let now = Utc::now();
        store.put_refresh("r0", entry(now + Duration::days(1)));

        let result = store.rotate_refresh("r0", "r1", now, |_| {
            Err::<RefreshEntry, _>(Rejection::Expired)
        });

        assert_eq!(result, Err(Rejection::Expired));
        assert!(store.get_refresh("r1").is_none());
        assert_eq!(store.get_refresh("r0").unwrap().state, RefreshState::Active);
    }

    #[test]
    fn test_concurrent_rotation_has_single_winner() {
        let store = Arc::new(TokenStore::new());
        let now = Utc::now();
        store.put_refresh("shared", entry(now + Duration::days(1)));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .rotate_refresh("shared", &format!("next-{i}"), now, same)
                        .is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = TokenStore::new();
        store.put_refresh("r", entry(Utc::now() + Duration::hours(1)));
        assert!(store.delete_refresh("r"));
        assert!(!store.delete_refresh("r"));
    }

    #[test]
    fn test_delete_family_removes_all_generations() {
        let store = TokenStore::new();
        let now = Utc::now();
        let first = entry(now + Duration::days(1));
        let family = first.family;
        store.put_refresh("r0", first);
        store.rotate_refresh("r0", "r1", now, same).unwrap();
        store.put_refresh("other", entry(now + Duration::days(1)));

        assert_eq!(store.delete_family(family), 2);
        assert_eq!(store.refresh_count(), 1);
        assert!(store.get_refresh("other").is_some());
    }

    #[test]
    fn test_revocation_set() {
        let store = TokenStore::new();
        let jti = Uuid::new_v4();
        assert!(!store.is_revoked(&jti));
        store.revoke_access(jti, Utc::now() + Duration::minutes(15));
        assert!(store.is_revoked(&jti));
    }

    #[test]
    fn test_purge_keeps_entries_at_or_after_now() {
        let store = TokenStore::new();
        let now = Utc::now();

        store.put_refresh("expired", entry(now - Duration::seconds(1)));
        store.put_refresh("boundary", entry(now));
        store.put_refresh("valid", entry(now + Duration::hours(1)));

        let gone = Uuid::new_v4();
        let edge = Uuid::new_v4();
        let live = Uuid::new_v4();
        store.revoke_access(gone, now - Duration::seconds(1));
        store.revoke_access(edge, now);
        store.revoke_access(live, now + Duration::hours(1));

        let stats = store.purge_expired(now);

        assert_eq!(
            stats,
            PurgeStats {
                refresh_removed: 1,
                revocations_removed: 1,
            }
        );
        assert!(store.get_refresh("expired").is_none());
        assert!(store.get_refresh("boundary").is_some());
        assert!(store.get_refresh("valid").is_some());
        assert!(!store.is_revoked(&gone));
        assert!(store.is_revoked(&edge));
        assert!(store.is_revoked(&live));
    }

    #[test]
    fn test_purge_removes_expired_superseded_entries() {
        let store = TokenStore::new();
        let now = Utc::now();
        store.put_refresh("r0", entry(now + Duration::hours(1)));
        store.rotate_refresh("r0", "r1", now, same).unwrap();

        let later = now + Duration::hours(2);
        let stats = store.purge_expired(later);
        assert_eq!(stats.refresh_removed, 2);
        assert_eq!(store.check_refresh("r0", later), Err(Rejection::NotFound));
    }
}
