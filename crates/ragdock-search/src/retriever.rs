//! Semantic retrieval over a workspace index.

use std::sync::Arc;

use ragdock_core::{Error, IndexDocument};
use tracing::{debug, warn};

use crate::backend::SearchBackend;
use crate::types::QueryRequest;

/// How many matches a query asks for.
pub const TOP_MATCHES: usize = 10;

/// A retrieved document with its ranking signals.
#[derive(Debug, Clone)]
pub struct RankedDocument {
    pub score: f64,
    /// Present when the service re-ranked the hit semantically.
    pub reranker_score: Option<f64>,
    pub document: IndexDocument,
}

/// Runs semantic queries and shapes the results.
///
/// A missing index is not an error: retrieval returns an empty list and the
/// caller falls back to answering without workspace context.
pub struct Retriever {
    backend: Arc<dyn SearchBackend>,
}

impl Retriever {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    pub async fn search(
        &self,
        index_name: &str,
        query_text: &str,
        filter: Option<&str>,
    ) -> Vec<RankedDocument> {
        let request = QueryRequest {
            search: query_text.to_string(),
            top: TOP_MATCHES,
            query_type: "semantic".into(),
            semantic_configuration: format!("search{index_name}"),
            query_language: "en-US".into(),
            filter: filter.map(String::from),
        };

        let hits = match self.backend.query(index_name, &request).await {
            Ok(hits) => hits,
            Err(Error::NotFound(_)) => {
                debug!("Index {} does not exist; returning no context", index_name);
                return Vec::new();
            }
            Err(e) => {
                warn!("Query against {} failed: {}", index_name, e);
                return Vec::new();
            }
        };

        hits.into_iter()
            .filter_map(|hit| {
                match serde_json::from_value::<IndexDocument>(hit.document.clone()) {
                    Ok(document) => Some(RankedDocument {
                        score: hit.score,
                        reranker_score: hit.reranker_score,
                        document,
                    }),
                    Err(e) => {
                        warn!("Dropping malformed hit from {}: {}", index_name, e);
                        None
                    }
                }
            })
            .collect()
    }
}
