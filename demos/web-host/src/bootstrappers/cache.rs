use super::SigningKeys;
use bootwright::prelude::*;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

/// In-memory lookup table filled in the background after startup.
#[derive(Default)]
pub struct Cache {
    entries: RwLock<HashMap<String, String>>,
}

impl Cache {
    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().await.insert(key.into(), value.into());
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

pub struct CacheBootstrapper;

#[bootstrapper]
impl CacheBootstrapper {
    pub fn configure_services(services: ServiceCollection) -> Result<()> {
        services.register(Cache::default())
    }

    pub async fn initialize_services_async(
        cache: Arc<Cache>,
        keys: Arc<SigningKeys>,
        config: ConfigService,
    ) -> anyhow::Result<()> {
        let delay = config
            .parse::<u64>("CACHE_WARMUP_MS")?
            .map_or(Duration::from_millis(500), Duration::from_millis);
        tracing::info!("Warming cache for {:?}...", delay);
        tokio::time::sleep(delay).await;

        cache.insert("fingerprint", keys.fingerprint()).await;
        cache.insert("greeting", "hello").await;
        tracing::info!("Cache warmed with {} entries", cache.len().await);
        Ok(())
    }
}
