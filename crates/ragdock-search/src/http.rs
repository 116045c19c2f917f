//! REST client for the search service.

use std::time::Duration;

use async_trait::async_trait;
use ragdock_core::{Error, IndexDocument, Result, SearchSettings};
use serde_json::json;
use tracing::debug;

use crate::backend::SearchBackend;
use crate::types::{DocumentStatus, IndexDefinition, QueryRequest, SearchHit};

/// HTTP implementation of [`SearchBackend`].
///
/// Authenticates with the `api-key` header; every URL carries the
/// `api-version` query parameter.
pub struct HttpSearchBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    api_version: String,
}

impl HttpSearchBackend {
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::Search(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            api_version: settings.api_version.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}?api-version={}",
            self.endpoint,
            path.trim_start_matches('/'),
            self.api_version
        )
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn list_index_names(&self) -> Result<Vec<String>> {
        let response = self
            .request(reqwest::Method::GET, "indexes")
            .send()
            .await
            .map_err(|e| Error::Search(format!("list indexes failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Search(format!(
                "list indexes returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("unreadable index list: {e}")))?;

        let names = body["value"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item["name"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();
        Ok(names)
    }

    async fn create_index(&self, definition: &IndexDefinition) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, "indexes")
            .json(definition)
            .send()
            .await
            .map_err(|e| Error::Search(format!("create index failed: {e}")))?;

        let status = response.status();
        // Another writer won the exists→create race; their index is ours too.
        if status == reqwest::StatusCode::CONFLICT {
            debug!("Index {} already exists", definition.name);
            return Ok(());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "create index {} returned {status}: {body}",
                definition.name
            )));
        }
        Ok(())
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("indexes/{name}"))
            .send()
            .await
            .map_err(|e| Error::Search(format!("delete index failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !status.is_success() {
            return Err(Error::Search(format!(
                "delete index {name} returned {status}"
            )));
        }
        Ok(())
    }

    async fn upload_documents(
        &self,
        index_name: &str,
        documents: &[IndexDocument],
    ) -> Result<Vec<DocumentStatus>> {
        let actions: Vec<serde_json::Value> = documents
            .iter()
            .map(|doc| {
                let mut value = serde_json::to_value(doc).unwrap_or_default();
                if let Some(map) = value.as_object_mut() {
                    map.insert("@search.action".into(), json!("mergeOrUpload"));
                }
                value
            })
            .collect();

        let response = self
            .request(
                reqwest::Method::POST,
                &format!("indexes/{index_name}/docs/index"),
            )
            .json(&json!({ "value": actions }))
            .send()
            .await
            .map_err(|e| Error::Search(format!("document upload failed: {e}")))?;

        let status = response.status();
        // 207 means partial success; per-document statuses tell the story.
        if !status.is_success() && status.as_u16() != 207 {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "document upload to {index_name} returned {status}: {body}"
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("unreadable upload result: {e}")))?;

        let statuses = body["value"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| DocumentStatus {
                        key: item["key"].as_str().unwrap_or_default().to_string(),
                        status: item["status"].as_bool().unwrap_or(false),
                        error_message: item["errorMessage"].as_str().map(String::from),
                        status_code: item["statusCode"].as_u64().map(|c| c as u16),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(statuses)
    }

    async fn query(&self, index_name: &str, request: &QueryRequest) -> Result<Vec<SearchHit>> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("indexes/{index_name}/docs/search"),
            )
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Search(format!("query failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("index {index_name}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "query against {index_name} returned {status}: {body}"
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("unreadable query result: {e}")))?;

        let hits = body["value"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| SearchHit {
                        score: item["@search.score"].as_f64().unwrap_or(0.0),
                        reranker_score: item["@search.rerankerScore"].as_f64(),
                        document: item.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_carry_api_version() {
        let backend = HttpSearchBackend::new(&SearchSettings {
            endpoint: "https://search.example.net/".into(),
            api_key: "key".into(),
            api_version: "2023-11-01".into(),
            timeout_secs: 30,
        })
        .unwrap();

        assert_eq!(
            backend.url("indexes/myindex/docs/search"),
            "https://search.example.net/indexes/myindex/docs/search?api-version=2023-11-01"
        );
    }
}
