//! The asset-caching worker: precaches the app shell at install, prunes
//! outdated stores at activation and answers every request with a
//! per-resource strategy.

use std::sync::{Mutex, PoisonError};

use futures::future::try_join_all;
use reqwest::Url;
use tracing::{debug, error, info, warn};

use super::{CacheError, CacheStorage};
use crate::api::{Fetch, FetchError, Response};
use crate::config::Config;

/// Lifecycle of one worker generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    /// Failed to install, or replaced by a newer generation.
    Redundant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Data and images: fresh copy if possible, last stored copy otherwise.
    NetworkFirst,
    /// App shell: precached copy, network only on a miss.
    CacheFirst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSettings {
    pub static_name: String,
    pub dynamic_name: String,
    pub shell: Vec<Url>,
    /// URL path prefixes handled network-first.
    pub network_first_prefixes: Vec<String>,
}

impl WorkerSettings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            static_name: config.static_cache_name(),
            dynamic_name: config.dynamic_cache_name(),
            shell: config.shell_urls()?,
            network_first_prefixes: config.network_first_prefixes()?,
        })
    }
}

pub struct OfflineCache<N> {
    network: N,
    storage: CacheStorage,
    settings: WorkerSettings,
    state: Mutex<WorkerState>,
}

impl<N: Fetch> OfflineCache<N> {
    pub fn new(network: N, storage: CacheStorage, settings: WorkerSettings) -> Self {
        Self {
            network,
            storage,
            settings,
            state: Mutex::new(WorkerState::Parsed),
        }
    }

    pub fn state(&self) -> WorkerState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn settings(&self) -> &WorkerSettings {
        &self.settings
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    fn set_state(&self, state: WorkerState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn transition(&self, action: &'static str, from: WorkerState, to: WorkerState) -> Result<(), CacheError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != from {
            return Err(CacheError::InvalidState { action, state: *state });
        }
        *state = to;
        Ok(())
    }

    /// Precache every shell file into the static store.
    ///
    /// All-or-nothing: fetches run concurrently, and the store is written only
    /// after every one of them succeeded. Any failure leaves the static store
    /// untouched and makes this worker redundant.
    pub async fn install(&self) -> Result<(), CacheError> {
        self.transition("install", WorkerState::Parsed, WorkerState::Installing)?;
        info!(
            store = %self.settings.static_name,
            files = self.settings.shell.len(),
            "Installing worker, precaching app shell"
        );

        match self.precache_shell().await {
            Ok(()) => {
                self.set_state(WorkerState::Installed);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Install failed, app shell not committed");
                self.set_state(WorkerState::Redundant);
                Err(e)
            }
        }
    }

    async fn precache_shell(&self) -> Result<(), CacheError> {
        let responses = try_join_all(self.settings.shell.iter().map(|url| self.precache(url))).await?;
        self.storage.commit(&self.settings.static_name, &responses)
    }

    async fn precache(&self, url: &Url) -> Result<Response, CacheError> {
        self.network
            .fetch(url)
            .await
            .and_then(Response::error_for_status)
            .map_err(|source| CacheError::Precache {
                url: url.to_string(),
                source,
            })
    }

    /// Delete every store that is not one of this worker's two stores.
    ///
    /// Returns the names removed. A store that cannot be removed is logged
    /// and left for the next activation.
    pub fn activate(&self) -> Result<Vec<String>, CacheError> {
        self.transition("activate", WorkerState::Installed, WorkerState::Activating)?;
        info!("Activating worker");

        let keys = self.storage.keys().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to list cache stores");
            Vec::new()
        });

        let mut removed = Vec::new();
        for key in keys {
            if key == self.settings.static_name || key == self.settings.dynamic_name {
                continue;
            }
            match self.storage.delete(&key) {
                Ok(_) => {
                    info!(store = %key, "Removing old cache");
                    removed.push(key);
                }
                Err(e) => warn!(store = %key, error = %e, "Failed to remove old cache"),
            }
        }

        self.set_state(WorkerState::Activated);
        Ok(removed)
    }

    /// Take over a shell precached by an earlier run of the same version,
    /// skipping install. Returns false when no such shell is on disk.
    pub fn resume(&self) -> bool {
        if !self.storage.has(&self.settings.static_name) {
            return false;
        }
        self.transition("resume", WorkerState::Parsed, WorkerState::Activated)
            .is_ok()
    }

    /// Mark this generation as replaced.
    pub fn retire(&self) {
        self.set_state(WorkerState::Redundant);
    }

    pub fn strategy_for(&self, url: &Url) -> Strategy {
        let path = url.path();
        if self
            .settings
            .network_first_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            Strategy::NetworkFirst
        } else {
            Strategy::CacheFirst
        }
    }

    /// Answer a request the way the worker's fetch handler would.
    pub async fn handle_fetch(&self, url: &Url) -> Result<Response, FetchError> {
        match self.strategy_for(url) {
            Strategy::NetworkFirst => self.network_first(url).await,
            Strategy::CacheFirst => self.cache_first(url).await,
        }
    }

    async fn network_first(&self, url: &Url) -> Result<Response, FetchError> {
        match self.network.fetch(url).await {
            Ok(response) => {
                // Error pages must not replace the last good copy
                if response.is_success() {
                    self.remember(url, &response);
                }
                Ok(response)
            }
            Err(e) => {
                if e.is_unreachable() {
                    debug!(url = %url, "Offline, serving from dynamic cache");
                } else {
                    warn!(url = %url, error = %e, "Network fetch failed, serving from dynamic cache");
                }
                self.lookup(&self.settings.dynamic_name, url)
                    .ok_or_else(|| FetchError::NotCached(url.to_string()))
            }
        }
    }

    async fn cache_first(&self, url: &Url) -> Result<Response, FetchError> {
        if let Some(response) = self.lookup(&self.settings.static_name, url) {
            return Ok(response);
        }
        debug!(url = %url, "Not precached, fetching from network");
        self.network.fetch(url).await
    }

    fn remember(&self, url: &Url, response: &Response) {
        let stored = self
            .storage
            .open(&self.settings.dynamic_name)
            .and_then(|store| store.put(url.as_str(), response));
        if let Err(e) = stored {
            warn!(url = %url, error = %e, "Failed to store response in dynamic cache");
        }
    }

    fn lookup(&self, store: &str, url: &Url) -> Option<Response> {
        if !self.storage.has(store) {
            return None;
        }
        match self.storage.open(store).and_then(|s| s.get(url.as_str())) {
            Ok(Some(cached)) => {
                debug!(url = %url, store, age = %cached.age_display(), "Cache hit");
                Some(cached.data)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(url = %url, store, error = %e, "Failed to read cache entry");
                None
            }
        }
    }
}
