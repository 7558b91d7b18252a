//! Translation result cache.
//!
//! [`CacheStore`] wraps a [`CacheBackend`] with a [`CachePolicy`]. A disabled
//! cache and an absent entry look the same to callers: both are `None`.

mod key;
mod memory;
pub(crate) mod sqlite;

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;

pub use key::CacheKey;
pub use memory::MemoryCache;
pub use sqlite::{SqliteCache, default_db_path};

/// Prefix applied to every key written by this crate.
pub const CACHE_NAMESPACE: &str = "subtranslate";

/// Default entry lifetime (one day).
pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

/// A TTL key/value store reachable by opaque string keys.
pub trait CacheBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value`; `ttl = None` keeps it until deleted.
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    fn delete(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Reads miss and writes are skipped.
    Disabled,
    /// Reads delete whatever is stored and miss; forces re-translation.
    Bypass,
    Ttl(Duration),
}

impl CachePolicy {
    /// Maps the `enabled`/`ttl` configuration pair, where a zero TTL bypasses.
    pub const fn from_settings(enabled: bool, ttl_secs: u64) -> Self {
        match (enabled, ttl_secs) {
            (false, _) => Self::Disabled,
            (true, 0) => Self::Bypass,
            (true, secs) => Self::Ttl(Duration::from_secs(secs)),
        }
    }
}

#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    policy: CachePolicy,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl CacheStore {
    pub fn new(backend: Arc<dyn CacheBackend>, policy: CachePolicy) -> Self {
        Self { backend, policy }
    }

    /// A store that never holds anything.
    pub fn disabled() -> Self {
        Self::new(Arc::new(MemoryCache::new()), CachePolicy::Disabled)
    }

    pub const fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub const fn is_enabled(&self) -> bool {
        !matches!(self.policy, CachePolicy::Disabled)
    }

    fn make_key(key: &str) -> String {
        format!("{CACHE_NAMESPACE}:{key}")
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let full_key = Self::make_key(key);

        match self.policy {
            CachePolicy::Disabled => None,
            CachePolicy::Bypass => {
                if let Err(e) = self.backend.delete(&full_key) {
                    tracing::warn!(cache_key = key, error = %e, "Failed to delete bypassed cache entry");
                }
                None
            }
            CachePolicy::Ttl(_) => self
                .backend
                .get(&full_key)
                .inspect_err(|e| tracing::warn!(cache_key = key, error = %e, "Cache read failed"))
                .ok()
                .flatten(),
        }
    }

    /// Returns `true` when the value was written.
    pub fn store(&self, key: &str, value: &str) -> bool {
        let ttl = match self.policy {
            CachePolicy::Disabled => return false,
            CachePolicy::Bypass => None,
            CachePolicy::Ttl(ttl) => Some(ttl),
        };

        match self.backend.set(&Self::make_key(key), value, ttl) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(cache_key = key, error = %e, "Cache write failed");
                false
            }
        }
    }

    pub fn delete(&self, key: &str) {
        if !self.is_enabled() {
            return;
        }

        if let Err(e) = self.backend.delete(&Self::make_key(key)) {
            tracing::warn!(cache_key = key, error = %e, "Cache delete failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store(policy: CachePolicy) -> (Arc<MemoryCache>, CacheStore) {
        let backend = Arc::new(MemoryCache::new());
        let store = CacheStore::new(backend.clone(), policy);
        (backend, store)
    }

    #[test]
    fn test_policy_from_settings() {
        assert_eq!(CachePolicy::from_settings(false, 3600), CachePolicy::Disabled);
        assert_eq!(CachePolicy::from_settings(true, 0), CachePolicy::Bypass);
        assert_eq!(
            CachePolicy::from_settings(true, 60),
            CachePolicy::Ttl(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_ttl_store_and_get() {
        let (_, store) = store(CachePolicy::Ttl(DEFAULT_TTL));

        assert!(store.store("1-5-FR", "<p>Bonjour</p>"));
        assert_eq!(store.get("1-5-FR"), Some("<p>Bonjour</p>".to_string()));
        assert_eq!(store.get("1-6-FR"), None);
    }

    #[test]
    fn test_keys_are_namespaced() {
        let (backend, store) = store(CachePolicy::Ttl(DEFAULT_TTL));
        store.store("1-5-FR", "x");

        assert_eq!(backend.get("subtranslate:1-5-FR").unwrap(), Some("x".to_string()));
        assert_eq!(backend.get("1-5-FR").unwrap(), None);
    }

    #[test]
    fn test_disabled_is_a_miss_and_skips_writes() {
        let (backend, store) = store(CachePolicy::Disabled);

        assert!(!store.store("1-5-FR", "x"));
        assert_eq!(backend.get("subtranslate:1-5-FR").unwrap(), None);

        backend.set("subtranslate:1-5-FR", "x", None).unwrap();
        assert_eq!(store.get("1-5-FR"), None);

        store.delete("1-5-FR");
        assert_eq!(backend.get("subtranslate:1-5-FR").unwrap(), Some("x".to_string()));
    }

    #[test]
    fn test_bypass_deletes_on_read() {
        let (backend, store) = store(CachePolicy::Bypass);

        assert!(store.store("1-5-FR", "x"));
        assert!(backend.get("subtranslate:1-5-FR").unwrap().is_some());

        assert_eq!(store.get("1-5-FR"), None);
        assert_eq!(backend.get("subtranslate:1-5-FR").unwrap(), None);
    }

    #[test]
    fn test_delete_removes_entry() {
        let (_, store) = store(CachePolicy::Ttl(DEFAULT_TTL));
        store.store("2-9-DE-progress", "processing");
        store.delete("2-9-DE-progress");
        assert_eq!(store.get("2-9-DE-progress"), None);
    }
}
