//! Process-lifetime cache of derived keys.

use {
    dashmap::DashMap,
    secrecy::{ExposeSecret, Secret},
    tracing::debug,
};

#[cfg(feature = "metrics")]
use busvault_metrics::{counter, gauge, keyvault as keyvault_metrics};

use crate::{
    error::{KeyVaultError, Result},
    identity::SecretIdentity,
    kdf::{self, DerivedKey},
};

/// Derived keys memoized by [`SecretIdentity`].
///
/// Entries are never evicted: a pinned version is immutable, and a cached
/// "latest" key is allowed to go stale until the process restarts.
///
/// Lookups for the same identity that race may each run their fetch; the
/// last insert wins. No map guard is held across the fetch `.await`, so a
/// slow vault call never blocks lookups for other identities.
#[derive(Debug, Default)]
pub struct KeyCache {
    entries: DashMap<SecretIdentity, DerivedKey>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached key for `identity` without fetching.
    pub fn get(&self, identity: &SecretIdentity) -> Option<DerivedKey> {
        self.entries
            .get(identity)
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, identity: &SecretIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the key for `identity`, calling `fetch` and deriving the key
    /// on a miss.
    ///
    /// A failed fetch becomes [`KeyVaultError::SecretUnavailable`] and leaves
    /// the cache unchanged.
    pub async fn get_or_fetch<F, Fut>(&self, identity: &SecretIdentity, fetch: F) -> Result<DerivedKey>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<Secret<String>>>,
    {
        if let Some(key) = self.get(identity) {
            #[cfg(feature = "metrics")]
            counter!(keyvault_metrics::KEY_CACHE_HITS_TOTAL).increment(1);
            return Ok(key);
        }

        #[cfg(feature = "metrics")]
        counter!(keyvault_metrics::KEY_CACHE_MISSES_TOTAL).increment(1);

        debug!(
            secret_name = %identity.name,
            secret_version = %identity.version,
            "derived key not cached, fetching secret"
        );

        let secret = fetch()
            .await
            .map_err(|source| KeyVaultError::SecretUnavailable {
                identity: identity.clone(),
                source,
            })?;
        let key = kdf::derive_key(secret.expose_secret());

        self.entries.insert(identity.clone(), key.clone());

        #[cfg(feature = "metrics")]
        gauge!(keyvault_metrics::KEY_CACHE_ENTRIES).set(self.entries.len() as f64);

        Ok(key)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        std::sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    fn counting_fetch(
        counter: &AtomicUsize,
        secret: &'static str,
    ) -> impl Future<Output = anyhow::Result<Secret<String>>> {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { Ok(Secret::new(secret.to_string())) }
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let cache = KeyCache::new();
        let fetches = AtomicUsize::new(0);
        let id = SecretIdentity::latest("secretA");

        let first = cache
            .get_or_fetch(&id, || counting_fetch(&fetches, "password"))
            .await
            .unwrap();
        let second = cache
            .get_or_fetch(&id, || counting_fetch(&fetches, "password"))
            .await
            .unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(first, kdf::derive_key("password"));
    }

    #[tokio::test]
    async fn identities_are_cached_separately() {
        let cache = KeyCache::new();
        let fetches = AtomicUsize::new(0);

        let latest = cache
            .get_or_fetch(&SecretIdentity::latest("s"), || {
                counting_fetch(&fetches, "one")
            })
            .await
            .unwrap();
        let pinned = cache
            .get_or_fetch(&SecretIdentity::new("s", "v2"), || {
                counting_fetch(&fetches, "two")
            })
            .await
            .unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_ne!(latest, pinned);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache = KeyCache::new();
        let id = SecretIdentity::latest("missing");

        let err = cache
            .get_or_fetch(&id, || async { Err(anyhow::anyhow!("not found")) })
            .await
            .unwrap_err();
        assert!(matches!(err, KeyVaultError::SecretUnavailable { .. }));
        assert!(cache.is_empty());
        assert!(!cache.contains(&id));

        // A later successful fetch populates the entry.
        cache
            .get_or_fetch(&id, || async { Ok(Secret::new("now-present".to_string())) })
            .await
            .unwrap();
        assert!(cache.contains(&id));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_lookups_converge_to_one_entry() {
        let cache = Arc::new(KeyCache::new());
        let fetches = Arc::new(AtomicUsize::new(0));
        let id = SecretIdentity::new("shared", "1");

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            let fetches = Arc::clone(&fetches);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch(&id, || {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        async {
                            tokio::task::yield_now().await;
                            Ok(Secret::new("same-secret".to_string()))
                        }
                    })
                    .await
                    .unwrap()
            }));
        }

        let expected = kdf::derive_key("same-secret");
        for handle in handles {
            assert_eq!(handle.await.unwrap(), expected);
        }

        // Duplicate fetches are allowed under a race, but at least one happened
        // and only a single entry remains.
        let count = fetches.load(Ordering::SeqCst);
        assert!((1..=16).contains(&count));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&id).unwrap(), expected);
    }
}
