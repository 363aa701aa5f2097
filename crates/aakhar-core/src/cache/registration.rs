use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reqwest::Url;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{CacheError, OfflineCache, WorkerState};
use crate::api::{Fetch, FetchError, Response};

/// Which worker, if any, controls the application's requests.
///
/// Until a worker activates, fetches go straight to the network. A new worker
/// takes over as soon as it has installed, and a failed install leaves the
/// current one in place.
pub struct Registration<N> {
    network: N,
    active: RwLock<Option<Arc<OfflineCache<N>>>>,
    generation: AtomicU64,
}

impl<N: Fetch> Registration<N> {
    pub fn new(network: N) -> Self {
        Self {
            network,
            active: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Install, activate and claim. Returns the stores removed on activation.
    pub async fn register(&self, worker: OfflineCache<N>) -> Result<Vec<String>, CacheError> {
        if let Err(e) = worker.install().await {
            warn!(error = %e, "Worker install failed, keeping current controller");
            return Err(e);
        }

        // No waiting phase: the new worker activates immediately
        let removed = worker.activate()?;

        let generation = self.take_control(worker).await;
        info!(generation, removed = removed.len(), "Worker activated and claimed clients");
        Ok(removed)
    }

    /// Put a worker whose shell is already on disk in control without
    /// installing it again. Hands the worker back when there is nothing to
    /// resume.
    pub async fn resume(&self, worker: OfflineCache<N>) -> Result<(), OfflineCache<N>> {
        if !worker.resume() {
            return Err(worker);
        }
        self.take_control(worker).await;
        Ok(())
    }

    async fn take_control(&self, worker: OfflineCache<N>) -> u64 {
        let mut active = self.active.write().await;
        if let Some(previous) = active.replace(Arc::new(worker)) {
            previous.retire();
        }
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub async fn controller(&self) -> Option<Arc<OfflineCache<N>>> {
        self.active.read().await.clone()
    }

    pub async fn active_state(&self) -> Option<WorkerState> {
        self.active.read().await.as_ref().map(|worker| worker.state())
    }

    /// Number of workers that have taken control so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl<N: Fetch> Fetch for Registration<N> {
    async fn fetch(&self, url: &Url) -> Result<Response, FetchError> {
        let controller = self.active.read().await.clone();
        match controller {
            Some(worker) => worker.handle_fetch(url).await,
            None => self.network.fetch(url).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::mock::{url, MockNetwork};
    use crate::cache::worker::tests::{serve_shell, settings};
    use crate::cache::CacheStorage;

    fn setup() -> (tempfile::TempDir, Arc<MockNetwork>, CacheStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();
        (dir, Arc::new(MockNetwork::new()), storage)
    }

    #[tokio::test]
    async fn test_uncontrolled_fetch_goes_to_network() {
        let (_dir, network, _storage) = setup();
        network.serve("assets/data/a.json", 200, "[]");
        let registration = Registration::new(network.clone());

        network.set_offline(false);
        assert!(registration.fetch(&url("assets/data/a.json")).await.is_ok());
        network.set_offline(true);
        assert!(registration.fetch(&url("assets/data/a.json")).await.is_err());
        assert_eq!(registration.generation(), 0);
    }

    #[tokio::test]
    async fn test_registered_worker_serves_offline() {
        let (_dir, network, storage) = setup();
        serve_shell(&network);
        network.serve("assets/data/a.json", 200, "[1]");
        let registration = Registration::new(network.clone());

        registration
            .register(OfflineCache::new(network.clone(), storage, settings("v2")))
            .await
            .unwrap();
        assert_eq!(registration.active_state().await, Some(WorkerState::Activated));

        registration.fetch(&url("assets/data/a.json")).await.unwrap();
        network.set_offline(true);
        let cached = registration.fetch(&url("assets/data/a.json")).await.unwrap();
        assert_eq!(cached.text(), "[1]");
        assert!(registration.fetch(&url("index.html")).await.is_ok());
    }

    #[tokio::test]
    async fn test_new_version_replaces_and_cleans_up() {
        let (_dir, network, storage) = setup();
        serve_shell(&network);
        let registration = Registration::new(network.clone());

        registration
            .register(OfflineCache::new(network.clone(), storage.clone(), settings("v1")))
            .await
            .unwrap();
        let first = registration.controller().await.unwrap();

        let removed = registration
            .register(OfflineCache::new(network.clone(), storage.clone(), settings("v2")))
            .await
            .unwrap();

        assert_eq!(removed, vec!["aakhar-static-v1"]);
        assert_eq!(first.state(), WorkerState::Redundant);
        assert_eq!(registration.generation(), 2);
        assert_eq!(storage.keys().unwrap(), vec!["aakhar-static-v2"]);
    }

    #[tokio::test]
    async fn test_resume_takes_over_without_network() {
        let (_dir, network, storage) = setup();
        serve_shell(&network);
        let first_run = Registration::new(network.clone());
        first_run
            .register(OfflineCache::new(network.clone(), storage.clone(), settings("v2")))
            .await
            .unwrap();

        network.set_offline(true);
        let second_run = Registration::new(network.clone());
        let calls = network.calls();
        assert!(second_run
            .resume(OfflineCache::new(network.clone(), storage.clone(), settings("v2")))
            .await
            .is_ok());
        assert_eq!(network.calls(), calls);
        assert!(second_run.fetch(&url("index.html")).await.is_ok());

        let unknown = OfflineCache::new(network.clone(), storage, settings("v3"));
        let returned = second_run.resume(unknown).await.unwrap_err();
        assert_eq!(returned.state(), WorkerState::Parsed);
        assert_eq!(second_run.generation(), 1);
    }

    #[tokio::test]
    async fn test_failed_install_keeps_previous_worker() {
        let (_dir, network, storage) = setup();
        serve_shell(&network);
        let registration = Registration::new(network.clone());
        registration
            .register(OfflineCache::new(network.clone(), storage.clone(), settings("v1")))
            .await
            .unwrap();

        network.set_offline(true);
        let result = registration
            .register(OfflineCache::new(network.clone(), storage.clone(), settings("v2")))
            .await;

        assert!(result.is_err());
        assert_eq!(registration.generation(), 1);
        assert_eq!(registration.active_state().await, Some(WorkerState::Activated));
        assert_eq!(storage.keys().unwrap(), vec!["aakhar-static-v1"]);
        // The v1 shell still answers
        assert!(registration.fetch(&url("index.html")).await.is_ok());
    }
}
