//! HTTP blob-store client.

use std::time::Duration;

use async_trait::async_trait;
use ragdock_core::{Error, Result, StorageSettings};
use tracing::debug;

use crate::ObjectStore;

/// Reads blobs over HTTP: `GET {endpoint}/{container}/{path}`, with an
/// optional shared access token appended as the query string.
pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(settings: &StorageSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::Storage(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            access_token: settings.access_token.clone(),
        })
    }

    fn blob_url(&self, path: &str, container: &str) -> String {
        let mut url = format!("{}/{}/{}", self.endpoint, container, path.trim_start_matches('/'));
        if let Some(token) = &self.access_token {
            url.push('?');
            url.push_str(token.trim_start_matches('?'));
        }
        url
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get(&self, path: &str, container: &str) -> Result<Vec<u8>> {
        let url = self.blob_url(path, container);
        debug!("Fetching blob {}/{}", container, path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("blob read failed for {path}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "blob read for {path} returned status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Storage(format!("blob body read failed for {path}: {e}")))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(token: Option<&str>) -> StorageSettings {
        StorageSettings {
            endpoint: "https://blobs.example.net/".into(),
            access_token: token.map(String::from),
            container: "documents".into(),
            timeout_secs: 30,
        }
    }

    #[test]
    fn blob_url_joins_endpoint_container_and_path() {
        let store = HttpObjectStore::new(&settings(None)).unwrap();
        assert_eq!(
            store.blob_url("workspace/finance-abc1234/report.pdf", "documents"),
            "https://blobs.example.net/documents/workspace/finance-abc1234/report.pdf"
        );
    }

    #[test]
    fn blob_url_appends_access_token() {
        let store = HttpObjectStore::new(&settings(Some("?sv=2023&sig=x"))).unwrap();
        assert_eq!(
            store.blob_url("a.txt", "documents"),
            "https://blobs.example.net/documents/a.txt?sv=2023&sig=x"
        );
    }
}
