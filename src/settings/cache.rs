//! Settings cache.
//!
//! Holds the most recently loaded settings for the lifetime of the resolver,
//! optionally bounded by a TTL, and can be invalidated explicitly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::LoadedSettings;

struct CachedSettings {
    settings: Arc<LoadedSettings>,
    stored_at: Instant,
}

/// Single-entry settings cache.
///
/// Two concurrent misses may both load and store; the value is the same
/// document either way, so the later write simply wins.
pub struct SettingsCache {
    ttl: Option<Duration>,
    entry: RwLock<Option<CachedSettings>>,
}

impl SettingsCache {
    /// Creates an empty cache. `ttl == None` keeps an entry until invalidated.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Returns the cached settings if present and not expired.
    pub async fn get(&self) -> Option<Arc<LoadedSettings>> {
        let guard = self.entry.read().await;
        let cached = guard.as_ref()?;
        if let Some(ttl) = self.ttl {
            if cached.stored_at.elapsed() >= ttl {
                return None;
            }
        }
        Some(Arc::clone(&cached.settings))
    }

    /// Stores freshly loaded settings.
    pub async fn store(&self, settings: Arc<LoadedSettings>) {
        let mut guard = self.entry.write().await;
        *guard = Some(CachedSettings {
            settings,
            stored_at: Instant::now(),
        });
    }

    /// Drops the cached entry; the next read reloads from the sources.
    pub async fn invalidate(&self) {
        let mut guard = self.entry.write().await;
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::defaults::default_settings;
    use crate::settings::SettingsSource;

    fn loaded() -> Arc<LoadedSettings> {
        Arc::new(LoadedSettings {
            settings: default_settings(),
            source: SettingsSource::Default,
        })
    }

    #[tokio::test]
    async fn test_empty_cache_misses() {
        let cache = SettingsCache::new(None);
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_store_then_get() {
        let cache = SettingsCache::new(None);
        let value = loaded();
        cache.store(Arc::clone(&value)).await;
        let hit = cache.get().await.expect("cached");
        assert!(Arc::ptr_eq(&hit, &value));
    }

    #[tokio::test]
    async fn test_invalidate_clears_entry() {
        let cache = SettingsCache::new(None);
        cache.store(loaded()).await;
        cache.invalidate().await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_ttl_expires_entry() {
        let cache = SettingsCache::new(Some(Duration::from_millis(20)));
        cache.store(loaded()).await;
        assert!(cache.get().await.is_some());
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get().await.is_none());
    }
}
