//! Data accessor for category manifests, vocabulary datasets and image paths.
//!
//! Requests go through whatever [`Fetch`] the client was built with; in the
//! application that is the offline cache registration, so datasets keep
//! loading from the last good copy when the network is gone.

use reqwest::Url;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::config::ImageExtension;
use crate::models::{Category, VocabularyEntry};

use super::{Fetch, FetchError};

/// Where the static assets live, relative to the application base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub data_path: String,
    pub image_path: String,
    pub categories_manifest: String,
    pub image_extension: ImageExtension,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            data_path: "assets/data/".to_string(),
            image_path: "assets/images/".to_string(),
            categories_manifest: "_categories.json".to_string(),
            image_extension: ImageExtension::default(),
        }
    }
}

/// Characters replaced by `_` when turning English text into an image file name.
const IMAGE_NAME_REPLACED: &[char] = &[' ', '?', '\''];

/// "What is your name?" -> "assets/images/What_is_your_name_.jpg"
pub fn image_path_for(image_path: &str, english: &str, extension: ImageExtension) -> String {
    let file_name: String = english
        .chars()
        .map(|c| if IMAGE_NAME_REPLACED.contains(&c) { '_' } else { c })
        .collect();
    format!("{}{}.{}", image_path, file_name, extension.as_str())
}

pub struct DataClient<F> {
    fetcher: F,
    base_url: Url,
    paths: AssetPaths,
    /// Category list, fetched once per client and kept until it is dropped
    categories: Mutex<Option<Vec<Category>>>,
}

impl<F: Fetch> DataClient<F> {
    pub fn new(fetcher: F, base_url: Url, paths: AssetPaths) -> Self {
        Self {
            fetcher,
            base_url,
            paths,
            categories: Mutex::new(None),
        }
    }

    pub fn paths(&self) -> &AssetPaths {
        &self.paths
    }

    /// Categories listed in the manifest, with display titles.
    ///
    /// Never fails: a fetch or parse error is logged and yields an empty list.
    /// Only a successful fetch is memoized, so a later call retries.
    pub async fn fetch_category_list(&self) -> Vec<Category> {
        let mut memo = self.categories.lock().await;
        if let Some(ref categories) = *memo {
            return categories.clone();
        }

        let manifest = format!("{}{}", self.paths.data_path, self.paths.categories_manifest);
        match self.get_json::<Vec<String>>(&manifest).await {
            Ok(ids) => {
                let categories: Vec<Category> = ids
                    .into_iter()
                    .filter(|id| {
                        let valid = is_valid_category_id(id);
                        if !valid {
                            warn!(id = %id, "Skipping invalid category id in manifest");
                        }
                        valid
                    })
                    .map(Category::from_id)
                    .collect();
                debug!(count = categories.len(), "Category manifest loaded");
                *memo = Some(categories.clone());
                categories
            }
            Err(e) => {
                error!(error = %e, "Error fetching category list");
                Vec::new()
            }
        }
    }

    /// Entries of one category. Empty on any failure, which callers treat the
    /// same as a category without data.
    pub async fn fetch_category_data(&self, id: &str) -> Vec<VocabularyEntry> {
        if !is_valid_category_id(id) {
            warn!(id = %id, "Refusing to fetch invalid category id");
            return Vec::new();
        }

        let path = format!("{}{}.json", self.paths.data_path, id);
        match self.get_json::<Vec<VocabularyEntry>>(&path).await {
            Ok(entries) => {
                debug!(id = %id, count = entries.len(), "Category data loaded");
                entries
            }
            Err(e) => {
                error!(id = %id, error = %e, "Error fetching category data");
                Vec::new()
            }
        }
    }

    pub fn image_path_for(&self, english: &str) -> String {
        image_path_for(&self.paths.image_path, english, self.paths.image_extension)
    }

    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.resolve(path)?;
        let response = self.fetcher.fetch(&url).await?.error_for_status()?;
        response.json()
    }
}

/// Ids become file names, so no separators or parent references.
fn is_valid_category_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && !id.contains("..")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::http::mock::{MockNetwork, BASE};

    fn client(network: &Arc<MockNetwork>) -> DataClient<Arc<MockNetwork>> {
        DataClient::new(network.clone(), Url::parse(BASE).unwrap(), AssetPaths::default())
    }

    #[tokio::test]
    async fn test_category_titles_are_derived_from_ids() {
        let network = Arc::new(MockNetwork::new());
        network.serve_json("assets/data/_categories.json", json!(["common_words", "relations"]));

        let categories = client(&network).fetch_category_list().await;
        assert_eq!(
            categories,
            vec![
                Category { id: "common_words".into(), title: "Common Words".into() },
                Category { id: "relations".into(), title: "Relations".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_category_list_is_memoized() {
        let network = Arc::new(MockNetwork::new());
        network.serve_json("assets/data/_categories.json", json!(["common_words"]));
        let client = client(&network);

        client.fetch_category_list().await;
        client.fetch_category_list().await;
        assert_eq!(network.calls(), 1);
    }

    #[tokio::test]
    async fn test_category_list_failure_is_empty_and_retried() {
        let network = Arc::new(MockNetwork::new());
        network.set_offline(true);
        let client = client(&network);

        assert!(client.fetch_category_list().await.is_empty());

        network.set_offline(false);
        network.serve_json("assets/data/_categories.json", json!(["animals"]));
        assert_eq!(client.fetch_category_list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_manifest_ids_are_skipped() {
        let network = Arc::new(MockNetwork::new());
        network.serve_json("assets/data/_categories.json", json!(["ok", "", "../secret"]));
        let categories = client(&network).fetch_category_list().await;
        assert_eq!(categories.len(), 1);
    }

    #[tokio::test]
    async fn test_category_data_failures_are_empty() {
        let network = Arc::new(MockNetwork::new());
        network.serve("assets/data/broken.json", 200, "{not json");
        let client = client(&network);

        assert!(client.fetch_category_data("broken").await.is_empty());
        assert!(client.fetch_category_data("missing").await.is_empty());
        assert!(client.fetch_category_data("../etc").await.is_empty());
    }

    #[tokio::test]
    async fn test_category_data_parses_entries() {
        let network = Arc::new(MockNetwork::new());
        network.serve_json(
            "assets/data/relations.json",
            json!([{"English": "Mother", "Hindi": "माँ", "Garhwali": "ब्वे"}]),
        );
        let entries = client(&network).fetch_category_data("relations").await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].garhwali.as_deref(), Some("ब्वे"));
    }

    #[test]
    fn test_image_path_for() {
        assert_eq!(
            image_path_for("assets/images/", "What is your name?", ImageExtension::Jpg),
            "assets/images/What_is_your_name_.jpg"
        );
        assert_eq!(
            image_path_for("assets/images/", "Don't go", ImageExtension::Png),
            "assets/images/Don_t_go.png"
        );
    }
}
