//! Application wiring.
//!
//! `AppContext` is what views see: configuration, the data client and the
//! install bridge. `App` owns the real transport stack behind it, with the
//! HTTP network wrapped by the offline cache registration.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::api::{DataClient, Fetch, HttpNetwork};
use crate::cache::{CacheStorage, OfflineCache, Registration, WorkerSettings};
use crate::config::Config;
use crate::install::InstallBridge;
use crate::ui::Router;

/// Directory under the cache dir holding one subdirectory per store.
const CACHE_STORES_DIR: &str = "caches";

pub struct AppContext<F> {
    pub config: Config,
    pub data: DataClient<F>,
    pub install: InstallBridge,
}

impl<F: Fetch> AppContext<F> {
    pub fn new(config: Config, fetcher: F) -> Result<Self> {
        let base_url = config.base_url()?;
        let data = DataClient::new(fetcher, base_url, config.asset_paths());
        Ok(Self {
            config,
            data,
            install: InstallBridge::new(),
        })
    }
}

/// Transport used by the running application.
pub type AppFetch = Arc<Registration<HttpNetwork>>;

pub struct App {
    pub context: Arc<AppContext<AppFetch>>,
    pub registration: AppFetch,
    pub storage: CacheStorage,
    network: HttpNetwork,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let network = HttpNetwork::new(config.request_timeout())
            .context("Failed to create HTTP client")?;
        let stores_dir = config.cache_dir()?.join(CACHE_STORES_DIR);
        let storage = CacheStorage::new(stores_dir)
            .context("Failed to open cache storage")?;

        let registration = Arc::new(Registration::new(network.clone()));
        let context = Arc::new(AppContext::new(config, registration.clone())?);

        Ok(Self {
            context,
            registration,
            storage,
            network,
        })
    }

    pub fn config(&self) -> &Config {
        &self.context.config
    }

    /// A fresh worker for the configured cache version.
    pub fn worker(&self) -> Result<OfflineCache<HttpNetwork>> {
        let settings = WorkerSettings::from_config(self.config())?;
        Ok(OfflineCache::new(self.network.clone(), self.storage.clone(), settings))
    }

    /// Install and activate a worker. Returns the outdated stores it removed.
    pub async fn register_worker(&self) -> Result<Vec<String>> {
        let worker = self.worker()?;
        let removed = self
            .registration
            .register(worker)
            .await
            .context("Failed to install offline cache")?;
        info!(version = %self.config().cache_version, "Offline cache ready");
        Ok(removed)
    }

    /// Put the current version's worker in control, reusing a shell an
    /// earlier run already precached and installing otherwise.
    pub async fn start_worker(&self) -> Result<()> {
        match self.registration.resume(self.worker()?).await {
            Ok(()) => {
                info!(version = %self.config().cache_version, "Resumed offline cache");
                Ok(())
            }
            Err(_) => self.register_worker().await.map(|_| ()),
        }
    }

    pub fn router(&self) -> Router<AppFetch> {
        Router::new(self.context.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::mock::{MockNetwork, BASE};

    #[test]
    fn test_context_uses_configured_asset_paths() {
        let config = Config {
            base_url: BASE.into(),
            data_path: "data/".into(),
            ..Config::default()
        };
        let context = AppContext::new(config, Arc::new(MockNetwork::new())).unwrap();
        assert_eq!(context.data.paths().data_path, "data/");
        assert!(!context.install.is_available());
    }

    #[test]
    fn test_context_rejects_invalid_base_url() {
        let config = Config { base_url: "not a url".into(), ..Config::default() };
        assert!(AppContext::new(config, Arc::new(MockNetwork::new())).is_err());
    }

    #[test]
    fn test_app_places_stores_under_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            cache_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let app = App::new(config).unwrap();
        assert_eq!(app.storage.root(), dir.path().join("caches"));
        assert_eq!(app.worker().unwrap().settings().static_name, "aakhar-static-v2");
    }
}
