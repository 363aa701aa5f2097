//! Transport seam between the data client, the offline cache and the network.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::FetchError;

/// A fetched resource. The body is fully buffered; datasets and images here
/// are small.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// URL that was requested, used as the cache key.
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            FetchError::InvalidResponse(format!("Failed to parse JSON from {}: {}", self.url, e))
        })
    }

    /// Map non-2xx statuses to an error, keeping successful responses.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::from_status(self.status, &self.url, &self.text()))
        }
    }
}

/// Anything that can resolve a URL to a response: the network itself, or the
/// offline cache sitting in front of it.
///
/// An `Err` means no response could be produced at all. HTTP error statuses
/// come back as `Ok` and are for the caller to judge.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Response, FetchError>> + Send;
}

impl<T: Fetch> Fetch for Arc<T> {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Response, FetchError>> + Send {
        (**self).fetch(url)
    }
}

/// Plain HTTP transport.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpNetwork {
    client: Client,
}

impl HttpNetwork {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpNetwork {
    async fn fetch(&self, url: &Url) -> Result<Response, FetchError> {
        debug!(url = %url, "Network fetch");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(Response {
            url: url.to_string(),
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory network for tests, with an offline switch and call counting.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    pub(crate) const BASE: &str = "http://aakhar.test/";

    #[derive(Default)]
    pub(crate) struct MockNetwork {
        routes: Mutex<HashMap<String, (u16, Vec<u8>)>>,
        offline: AtomicBool,
        calls: AtomicUsize,
    }

    impl MockNetwork {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Serve `body` at `path` (relative to [`BASE`]) with the given status.
        pub(crate) fn serve(&self, path: &str, status: u16, body: impl Into<Vec<u8>>) {
            self.routes
                .lock()
                .unwrap()
                .insert(url(path).to_string(), (status, body.into()));
        }

        pub(crate) fn serve_json(&self, path: &str, value: serde_json::Value) {
            self.serve(path, 200, value.to_string());
        }

        pub(crate) fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Fetch for MockNetwork {
        async fn fetch(&self, url: &Url) -> Result<Response, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline.load(Ordering::SeqCst) {
                return Err(FetchError::Offline(url.to_string()));
            }
            let route = self.routes.lock().unwrap().get(url.as_str()).cloned();
            let (status, body) = route.unwrap_or((404, b"not found".to_vec()));
            Ok(Response {
                url: url.to_string(),
                status,
                headers: vec![("content-type".to_string(), "application/octet-stream".to_string())],
                body,
            })
        }
    }

    pub(crate) fn url(path: &str) -> Url {
        Url::parse(BASE).unwrap().join(path).unwrap()
    }
}
