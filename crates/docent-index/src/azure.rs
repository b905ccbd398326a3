//! Azure AI Search index client.
//!
//! A thin wrapper over the service's REST query surface: idempotent index
//! creation, single-document upload, and hybrid (lexical + vector) search.
//! Every operation is one stateless remote call — no retry, pagination, or
//! consistency logic lives here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use docent_core::{defaults, DocumentRecord, Error, Result, SearchHit, Settings, VectorIndex};

use crate::types::*;

/// HNSW algorithm configuration name used in the index schema.
const HNSW_CONFIG_NAME: &str = "hnsw-config";

/// Vector search profile name binding the embedding field to HNSW.
const VECTOR_PROFILE_NAME: &str = "vector-profile";

/// Configuration for the Azure AI Search client.
#[derive(Debug, Clone)]
pub struct AzureSearchConfig {
    /// Service endpoint, e.g. `https://<service>.search.windows.net`.
    pub endpoint: String,
    /// Admin API key, sent in the `api-key` header.
    pub api_key: String,
    /// Index name.
    pub index_name: String,
    /// Embedding dimension the index schema is created with.
    pub dimension: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl AzureSearchConfig {
    /// Build a config from loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: settings.search_endpoint.clone(),
            api_key: settings.search_key.clone(),
            index_name: settings.search_index_name.clone(),
            dimension: defaults::EMBED_DIMENSION,
            timeout_secs: defaults::SEARCH_TIMEOUT_SECS,
        }
    }
}

/// Azure AI Search backed vector index.
pub struct AzureSearchIndex {
    client: Client,
    config: AzureSearchConfig,
}

impl AzureSearchIndex {
    /// Create a new client with the given configuration.
    pub fn new(config: AzureSearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Index(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &AzureSearchConfig {
        &self.config
    }

    /// Build a service URL with the API version attached.
    fn url(&self, path: &str) -> String {
        format!(
            "{}{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            path,
            defaults::SEARCH_API_VERSION
        )
    }

    /// Decode the API error envelope from a non-2xx response.
    async fn api_error(response: reqwest::Response) -> String {
        let status = response.status();
        let message = response
            .json::<AzureErrorResponse>()
            .await
            .map(|e| e.error.message)
            .unwrap_or_else(|_| "Unknown error".to_string());
        format!("Azure AI Search returned {}: {}", status, message)
    }

    /// The index schema: id (key), content (searchable), source
    /// (filterable), and the fixed-dimension embedding vector field with an
    /// HNSW search profile.
    fn index_definition(&self) -> IndexDefinition {
        IndexDefinition {
            name: self.config.index_name.clone(),
            fields: vec![
                IndexField {
                    name: "id".to_string(),
                    field_type: "Edm.String".to_string(),
                    key: Some(true),
                    searchable: None,
                    filterable: None,
                    dimensions: None,
                    vector_search_profile: None,
                },
                IndexField {
                    name: "content".to_string(),
                    field_type: "Edm.String".to_string(),
                    key: None,
                    searchable: Some(true),
                    filterable: None,
                    dimensions: None,
                    vector_search_profile: None,
                },
                IndexField {
                    name: "source".to_string(),
                    field_type: "Edm.String".to_string(),
                    key: None,
                    searchable: None,
                    filterable: Some(true),
                    dimensions: None,
                    vector_search_profile: None,
                },
                IndexField {
                    name: "embedding".to_string(),
                    field_type: "Collection(Edm.Single)".to_string(),
                    key: None,
                    searchable: Some(true),
                    filterable: None,
                    dimensions: Some(self.config.dimension),
                    vector_search_profile: Some(VECTOR_PROFILE_NAME.to_string()),
                },
            ],
            vector_search: VectorSearch {
                algorithms: vec![VectorSearchAlgorithm {
                    name: HNSW_CONFIG_NAME.to_string(),
                    kind: "hnsw".to_string(),
                }],
                profiles: vec![VectorSearchProfile {
                    name: VECTOR_PROFILE_NAME.to_string(),
                    algorithm: HNSW_CONFIG_NAME.to_string(),
                }],
            },
        }
    }
}

#[async_trait]
impl VectorIndex for AzureSearchIndex {
    async fn ensure_exists(&self) -> Result<bool> {
        let index_path = format!("/indexes/{}", self.config.index_name);

        let response = self
            .client
            .get(self.url(&index_path))
            .header("api-key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| Error::Index(format!("Index lookup failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => {
                info!(index = %self.config.index_name, "Index already exists");
                Ok(false)
            }
            StatusCode::NOT_FOUND => {
                let response = self
                    .client
                    .put(self.url(&index_path))
                    .header("api-key", &self.config.api_key)
                    .json(&self.index_definition())
                    .send()
                    .await
                    .map_err(|e| Error::Index(format!("Index creation failed: {}", e)))?;

                if !response.status().is_success() {
                    return Err(Error::Index(Self::api_error(response).await));
                }

                info!(index = %self.config.index_name, "Index created");
                Ok(true)
            }
            _ => Err(Error::Index(Self::api_error(response).await)),
        }
    }

    async fn upload(&self, record: DocumentRecord) -> Result<()> {
        if record.embedding.len() != self.config.dimension {
            return Err(Error::InvalidInput(format!(
                "Embedding has {} dimensions, index expects {}",
                record.embedding.len(),
                self.config.dimension
            )));
        }

        debug!(
            index = %self.config.index_name,
            id = %record.id,
            source = %record.source,
            "Uploading document"
        );

        let batch = IndexBatch {
            value: vec![IndexAction {
                action: "mergeOrUpload".to_string(),
                id: record.id.to_string(),
                content: record.content,
                source: record.source,
                embedding: record.embedding,
            }],
        };

        let response = self
            .client
            .post(self.url(&format!(
                "/indexes/{}/docs/index",
                self.config.index_name
            )))
            .header("api-key", &self.config.api_key)
            .json(&batch)
            .send()
            .await
            .map_err(|e| Error::Index(format!("Upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Index(Self::api_error(response).await));
        }

        let result: IndexBatchResponse = response
            .json()
            .await
            .map_err(|e| Error::Index(format!("Failed to parse upload response: {}", e)))?;

        if let Some(failed) = result.value.iter().find(|r| !r.status) {
            return Err(Error::Index(format!(
                "Document {} was rejected: {}",
                failed.key.as_deref().unwrap_or("<unknown>"),
                failed
                    .error_message
                    .as_deref()
                    .unwrap_or("no error message")
            )));
        }

        Ok(())
    }

    async fn search(&self, query: &str, vector: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        let request = SearchRequest {
            search: query.to_string(),
            select: "content,source".to_string(),
            top: top_k,
            vector_queries: vec![VectorQuery {
                kind: "vector".to_string(),
                vector: vector.to_vec(),
                fields: "embedding".to_string(),
                k: top_k,
            }],
        };

        let response = self
            .client
            .post(self.url(&format!(
                "/indexes/{}/docs/search",
                self.config.index_name
            )))
            .header("api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Index(format!("Search failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Index(Self::api_error(response).await));
        }

        let result: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Index(format!("Failed to parse search response: {}", e)))?;

        debug!(
            index = %self.config.index_name,
            result_count = result.value.len(),
            "Hybrid search completed"
        );

        Ok(result
            .value
            .into_iter()
            .map(|doc| SearchHit {
                content: doc.content,
                source: doc.source,
                score: doc.score,
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AzureSearchConfig {
        AzureSearchConfig {
            endpoint: "https://example.search.windows.net".to_string(),
            api_key: "admin-key".to_string(),
            index_name: "rag-index".to_string(),
            dimension: 768,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_url_appends_api_version() {
        let index = AzureSearchIndex::new(test_config()).unwrap();
        assert_eq!(
            index.url("/indexes/rag-index"),
            "https://example.search.windows.net/indexes/rag-index?api-version=2023-11-01"
        );
    }

    #[test]
    fn test_index_definition_schema() {
        let index = AzureSearchIndex::new(test_config()).unwrap();
        let def = index.index_definition();

        assert_eq!(def.name, "rag-index");
        let names: Vec<&str> = def.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "content", "source", "embedding"]);

        let id = &def.fields[0];
        assert_eq!(id.key, Some(true));

        let embedding = &def.fields[3];
        assert_eq!(embedding.field_type, "Collection(Edm.Single)");
        assert_eq!(embedding.dimensions, Some(768));
        assert_eq!(
            embedding.vector_search_profile.as_deref(),
            Some(VECTOR_PROFILE_NAME)
        );
    }
}
