//! Search service wire types.
//!
//! These serialize to the exact JSON the search service's REST API expects;
//! field names and nesting are part of the service contract, not ours to
//! rename.

use serde::{Deserialize, Serialize};

/// One field in an index schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searchable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facetable: Option<bool>,
}

impl IndexField {
    pub fn string(name: &str) -> Self {
        Self {
            name: name.into(),
            field_type: "Edm.String".into(),
            key: None,
            searchable: Some(true),
            filterable: None,
            sortable: None,
            facetable: None,
        }
    }

    pub fn string_collection(name: &str) -> Self {
        Self {
            field_type: "Collection(Edm.String)".into(),
            ..Self::string(name)
        }
    }

    pub fn key(name: &str) -> Self {
        Self {
            key: Some(true),
            searchable: Some(false),
            filterable: Some(true),
            ..Self::string(name)
        }
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = Some(true);
        self
    }
}

/// A named field reference inside a semantic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticField {
    #[serde(rename = "fieldName")]
    pub field_name: String,
}

impl SemanticField {
    pub fn new(name: &str) -> Self {
        Self {
            field_name: name.into(),
        }
    }
}

/// Field priorities for semantic re-ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizedFields {
    #[serde(rename = "titleField")]
    pub title_field: SemanticField,
    #[serde(rename = "prioritizedContentFields")]
    pub prioritized_content_fields: Vec<SemanticField>,
    #[serde(rename = "prioritizedKeywordsFields")]
    pub prioritized_keywords_fields: Vec<SemanticField>,
}

/// One semantic ranking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticConfiguration {
    pub name: String,
    #[serde(rename = "prioritizedFields")]
    pub prioritized_fields: PrioritizedFields,
}

/// The `semantic` section of an index definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticSettings {
    pub configurations: Vec<SemanticConfiguration>,
}

/// A full index definition as sent to the create-index endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub fields: Vec<IndexField>,
    pub semantic: SemanticSettings,
}

/// A semantic query as sent to the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub search: String,
    pub top: usize,
    #[serde(rename = "queryType")]
    pub query_type: String,
    #[serde(rename = "semanticConfiguration")]
    pub semantic_configuration: String,
    #[serde(rename = "queryLanguage")]
    pub query_language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Per-document outcome of an upload batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStatus {
    pub key: String,
    pub status: bool,
    #[serde(rename = "errorMessage")]
    pub error_message: Option<String>,
    #[serde(rename = "statusCode")]
    pub status_code: Option<u16>,
}

/// One ranked result from a query.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The service's relevance score.
    pub score: f64,
    /// Semantic re-ranking score, when the service produced one.
    pub reranker_score: Option<f64>,
    /// The stored document fields.
    pub document: serde_json::Value,
}
