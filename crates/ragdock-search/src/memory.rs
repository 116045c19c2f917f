//! In-memory search backend for development and tests.
//!
//! Mimics the service semantics the rest of the system relies on: idempotent
//! create, last-write-wins documents keyed by id, per-document upload
//! statuses, and a not-found error for queries against a missing index.
//! Scoring is naive term overlap: enough to rank test fixtures, not a
//! search engine.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use ragdock_core::{Error, IndexDocument, Result};
use tracing::debug;

use crate::backend::SearchBackend;
use crate::types::{DocumentStatus, IndexDefinition, QueryRequest, SearchHit};

#[derive(Default)]
struct MemoryIndex {
    documents: HashMap<String, IndexDocument>,
}

/// Process-local [`SearchBackend`].
#[derive(Default)]
pub struct MemorySearchBackend {
    indexes: RwLock<HashMap<String, MemoryIndex>>,
}

impl MemorySearchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held by an index, for assertions.
    pub fn document_count(&self, index_name: &str) -> usize {
        self.indexes
            .read()
            .get(index_name)
            .map(|index| index.documents.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl SearchBackend for MemorySearchBackend {
    async fn list_index_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.indexes.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn create_index(&self, definition: &IndexDefinition) -> Result<()> {
        let mut indexes = self.indexes.write();
        if indexes.contains_key(&definition.name) {
            debug!("Index {} already exists", definition.name);
            return Ok(());
        }
        indexes.insert(definition.name.clone(), MemoryIndex::default());
        Ok(())
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        self.indexes.write().remove(name);
        Ok(())
    }

    async fn upload_documents(
        &self,
        index_name: &str,
        documents: &[IndexDocument],
    ) -> Result<Vec<DocumentStatus>> {
        let mut indexes = self.indexes.write();
        let index = indexes
            .get_mut(index_name)
            .ok_or_else(|| Error::Search(format!("index {index_name} does not exist")))?;

        let statuses = documents
            .iter()
            .map(|doc| {
                if doc.id.trim().is_empty() {
                    return DocumentStatus {
                        key: doc.id.clone(),
                        status: false,
                        error_message: Some("document key is missing or empty".into()),
                        status_code: Some(400),
                    };
                }
                index.documents.insert(doc.id.clone(), doc.clone());
                DocumentStatus {
                    key: doc.id.clone(),
                    status: true,
                    error_message: None,
                    status_code: Some(200),
                }
            })
            .collect();
        Ok(statuses)
    }

    async fn query(&self, index_name: &str, request: &QueryRequest) -> Result<Vec<SearchHit>> {
        let indexes = self.indexes.read();
        let index = indexes
            .get(index_name)
            .ok_or_else(|| Error::NotFound(format!("index {index_name}")))?;

        let terms: Vec<String> = request
            .search
            .to_lowercase()
            .split_whitespace()
            .map(String::from)
            .collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<SearchHit> = index
            .documents
            .values()
            .filter(|doc| filter_matches(request.filter.as_deref(), doc))
            .filter_map(|doc| {
                let haystack = format!(
                    "{} {} {} {}",
                    doc.content, doc.summary, doc.file_name, doc.key_points.join(" ")
                )
                .to_lowercase();
                let matched = terms.iter().filter(|t| haystack.contains(*t)).count();
                if matched == 0 {
                    return None;
                }
                let score = matched as f64 / terms.len() as f64;
                Some(SearchHit {
                    score,
                    // Mirrors the service's wider re-ranking scale.
                    reranker_score: Some(score * 4.0),
                    document: serde_json::to_value(doc).unwrap_or_default(),
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(request.top);
        Ok(hits)
    }
}

/// Supports the one filter shape callers use: `field eq 'value'`.
fn filter_matches(filter: Option<&str>, doc: &IndexDocument) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    let Some((field, value)) = parse_eq_filter(filter) else {
        return true;
    };
    let actual = match field.as_str() {
        "id" => &doc.id,
        "fileName" => &doc.file_name,
        "fileType" => &doc.file_type,
        "workspaceId" => &doc.workspace_id,
        "workspaceName" => &doc.workspace_name,
        "uploadedBy" => &doc.uploaded_by,
        _ => return true,
    };
    actual == &value
}

fn parse_eq_filter(filter: &str) -> Option<(String, String)> {
    let (field, rest) = filter.trim().split_once(" eq ")?;
    let value = rest.trim().trim_matches('\'');
    Some((field.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, content: &str) -> IndexDocument {
        IndexDocument {
            id: id.into(),
            content: content.into(),
            file_name: format!("{id}.txt"),
            file_type: "text/plain".into(),
            workspace_id: "abc1234xyz".into(),
            workspace_name: "Finance".into(),
            uploaded_by: "user".into(),
            uploaded_at: "2026-08-06T00:00:00Z".into(),
            summary: String::new(),
            key_points: Vec::new(),
        }
    }

    fn definition(name: &str) -> IndexDefinition {
        crate::index::workspace_index_definition(name)
    }

    fn query(text: &str) -> QueryRequest {
        QueryRequest {
            search: text.into(),
            top: 10,
            query_type: "semantic".into(),
            semantic_configuration: "searchtest".into(),
            query_language: "en-US".into(),
            filter: None,
        }
    }

    #[tokio::test]
    async fn create_is_idempotent() {
        let backend = MemorySearchBackend::new();
        backend.create_index(&definition("idx")).await.unwrap();
        backend.create_index(&definition("idx")).await.unwrap();
        assert_eq!(backend.list_index_names().await.unwrap(), vec!["idx"]);
    }

    #[tokio::test]
    async fn recreate_does_not_clobber_documents() {
        let backend = MemorySearchBackend::new();
        backend.create_index(&definition("idx")).await.unwrap();
        backend
            .upload_documents("idx", &[doc("d1", "hello")])
            .await
            .unwrap();
        backend.create_index(&definition("idx")).await.unwrap();
        assert_eq!(backend.document_count("idx"), 1);
    }

    #[tokio::test]
    async fn reindex_same_id_overwrites() {
        let backend = MemorySearchBackend::new();
        backend.create_index(&definition("idx")).await.unwrap();
        backend
            .upload_documents("idx", &[doc("d1", "first version")])
            .await
            .unwrap();
        backend
            .upload_documents("idx", &[doc("d1", "second version")])
            .await
            .unwrap();

        assert_eq!(backend.document_count("idx"), 1);
        let hits = backend.query("idx", &query("second")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document["content"], "second version");
    }

    #[tokio::test]
    async fn upload_reports_per_document_status() {
        let backend = MemorySearchBackend::new();
        backend.create_index(&definition("idx")).await.unwrap();

        let statuses = backend
            .upload_documents("idx", &[doc("d1", "fine"), doc("", "no key")])
            .await
            .unwrap();

        assert!(statuses[0].status);
        assert!(!statuses[1].status);
        assert!(statuses[1].error_message.is_some());
    }

    #[tokio::test]
    async fn query_missing_index_is_not_found() {
        let backend = MemorySearchBackend::new();
        let err = backend.query("nope", &query("anything")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn query_ranks_by_term_overlap_and_respects_top() {
        let backend = MemorySearchBackend::new();
        backend.create_index(&definition("idx")).await.unwrap();
        backend
            .upload_documents(
                "idx",
                &[
                    doc("d1", "quarterly revenue report"),
                    doc("d2", "revenue only"),
                    doc("d3", "unrelated"),
                ],
            )
            .await
            .unwrap();

        let hits = backend.query("idx", &query("quarterly revenue")).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document["id"], "d1");
        assert!(hits[0].score > hits[1].score);
        assert!(hits[0].reranker_score.unwrap() > hits[0].score);
    }

    #[tokio::test]
    async fn eq_filter_restricts_results() {
        let backend = MemorySearchBackend::new();
        backend.create_index(&definition("idx")).await.unwrap();
        let mut other = doc("d2", "revenue");
        other.uploaded_by = "someone-else".into();
        backend
            .upload_documents("idx", &[doc("d1", "revenue"), other])
            .await
            .unwrap();

        let mut request = query("revenue");
        request.filter = Some("uploadedBy eq 'user'".into());
        let hits = backend.query("idx", &request).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document["id"], "d1");
    }
}
