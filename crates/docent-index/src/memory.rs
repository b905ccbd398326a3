//! In-memory vector index.
//!
//! A process-local [`VectorIndex`] used in tests and local development
//! where no Azure AI Search service is available. Ranking is plain cosine
//! similarity over the stored vectors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use docent_core::{defaults, DocumentRecord, Error, Result, SearchHit, VectorIndex};

/// In-memory document store implementing [`VectorIndex`].
pub struct MemoryIndex {
    dimension: usize,
    created: AtomicBool,
    records: RwLock<Vec<DocumentRecord>>,
}

impl MemoryIndex {
    /// Create an empty index with the default embedding dimension.
    pub fn new() -> Self {
        Self::with_dimension(defaults::EMBED_DIMENSION)
    }

    /// Create an empty index with a custom dimension.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            created: AtomicBool::new(false),
            records: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the stored records, for assertions in tests.
    pub fn records(&self) -> Vec<DocumentRecord> {
        self.records.read().unwrap().clone()
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Cosine similarity of two equal-length vectors. Zero vectors score 0.
fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn ensure_exists(&self) -> Result<bool> {
        Ok(!self.created.swap(true, Ordering::SeqCst))
    }

    async fn upload(&self, record: DocumentRecord) -> Result<()> {
        if record.embedding.len() != self.dimension {
            return Err(Error::InvalidInput(format!(
                "Embedding has {} dimensions, index expects {}",
                record.embedding.len(),
                self.dimension
            )));
        }
        self.records.write().unwrap().push(record);
        Ok(())
    }

    async fn search(&self, _query: &str, vector: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        let records = self.records.read().unwrap();
        let mut scored: Vec<SearchHit> = records
            .iter()
            .map(|r| SearchHit {
                content: r.content.clone(),
                source: r.source.clone(),
                score: Some(cosine(&r.embedding, vector)),
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        Ok(scored)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
