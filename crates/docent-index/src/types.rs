//! Azure AI Search REST API request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// INDEX DEFINITION
// =============================================================================

/// An index definition, sent when creating the index.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDefinition {
    pub name: String,
    pub fields: Vec<IndexField>,
    pub vector_search: VectorSearch,
}

/// A single field in the index schema.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
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
    pub dimensions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_search_profile: Option<String>,
}

/// Vector search configuration: HNSW algorithms plus named profiles.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorSearch {
    pub algorithms: Vec<VectorSearchAlgorithm>,
    pub profiles: Vec<VectorSearchProfile>,
}

/// A vector search algorithm configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorSearchAlgorithm {
    pub name: String,
    pub kind: String,
}

/// A profile binding a vector field to an algorithm configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorSearchProfile {
    pub name: String,
    pub algorithm: String,
}

// =============================================================================
// DOCUMENT UPLOAD
// =============================================================================

/// A single indexing action within a batch.
#[derive(Debug, Serialize)]
pub struct IndexAction {
    #[serde(rename = "@search.action")]
    pub action: String,
    pub id: String,
    pub content: String,
    pub source: String,
    pub embedding: Vec<f32>,
}

/// A batch of indexing actions.
#[derive(Debug, Serialize)]
pub struct IndexBatch {
    pub value: Vec<IndexAction>,
}

/// Response to an indexing batch.
#[derive(Debug, Deserialize)]
pub struct IndexBatchResponse {
    #[serde(default)]
    pub value: Vec<IndexingResult>,
}

/// Per-document indexing outcome.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingResult {
    #[serde(default)]
    pub key: Option<String>,
    pub status: bool,
    #[serde(default)]
    pub error_message: Option<String>,
}

// =============================================================================
// SEARCH
// =============================================================================

/// A hybrid search request: lexical text plus vector queries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub search: String,
    pub select: String,
    pub top: usize,
    pub vector_queries: Vec<VectorQuery>,
}

/// A single nearest-neighbor vector query.
#[derive(Debug, Serialize)]
pub struct VectorQuery {
    pub kind: String,
    pub vector: Vec<f32>,
    pub fields: String,
    pub k: usize,
}

/// Search response envelope.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub value: Vec<SearchDoc>,
}

/// A matched document row.
#[derive(Debug, Deserialize)]
pub struct SearchDoc {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: String,
    #[serde(rename = "@search.score", default)]
    pub score: Option<f64>,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error envelope returned by the Azure AI Search API.
#[derive(Debug, Deserialize)]
pub struct AzureErrorResponse {
    pub error: AzureError,
}

/// Detailed error information.
#[derive(Debug, Deserialize)]
pub struct AzureError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_action_serializes_search_action_key() {
        let action = IndexAction {
            action: "mergeOrUpload".to_string(),
            id: "abc".to_string(),
            content: "text".to_string(),
            source: "a.pdf".to_string(),
            embedding: vec![0.0, 1.0],
        };
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("\"@search.action\":\"mergeOrUpload\""));
    }

    #[test]
    fn test_search_request_uses_camel_case_vector_queries() {
        let request = SearchRequest {
            search: "rust".to_string(),
            select: "content,source".to_string(),
            top: 3,
            vector_queries: vec![VectorQuery {
                kind: "vector".to_string(),
                vector: vec![0.1],
                fields: "embedding".to_string(),
                k: 3,
            }],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("vectorQueries"));
        assert!(json.contains("\"kind\":\"vector\""));
    }

    #[test]
    fn test_search_doc_reads_score_annotation() {
        let json = r#"{"@search.score": 1.5, "content": "c", "source": "s.pdf"}"#;
        let doc: SearchDoc = serde_json::from_str(json).unwrap();
        assert_eq!(doc.score, Some(1.5));
        assert_eq!(doc.source, "s.pdf");
    }

    #[test]
    fn test_index_definition_round_trip() {
        let json = r#"{
            "name": "rag-index",
            "fields": [
                {"name": "id", "type": "Edm.String", "key": true},
                {"name": "embedding", "type": "Collection(Edm.Single)",
                 "dimensions": 768, "vectorSearchProfile": "vector-profile"}
            ],
            "vectorSearch": {
                "algorithms": [{"name": "hnsw-config", "kind": "hnsw"}],
                "profiles": [{"name": "vector-profile", "algorithm": "hnsw-config"}]
            }
        }"#;
        let def: IndexDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.fields[1].dimensions, Some(768));
        assert_eq!(def.vector_search.profiles[0].algorithm, "hnsw-config");
    }
}
