//! Shared data models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single ingested document as stored in the vector index.
///
/// One record per ingested file — no chunking. Records are immutable after
/// creation: the service never updates or deletes them, and chat reads them
/// only through search. The embedding length must match the dimension the
/// index was created with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Globally unique record id.
    pub id: Uuid,
    /// Full extracted text of the document.
    pub content: String,
    /// Original filename the document was uploaded as.
    pub source: String,
    /// Document-mode embedding of `content`.
    pub embedding: Vec<f32>,
}

impl DocumentRecord {
    /// Create a record with a freshly generated id.
    pub fn new(content: String, source: String, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            source,
            embedding,
        }
    }
}

/// A single hit returned by a knowledge search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    /// Stored document content.
    pub content: String,
    /// Source filename of the matched document.
    pub source: String,
    /// Relevance score reported by the index, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_generates_unique_ids() {
        let a = DocumentRecord::new("text".into(), "a.pdf".into(), vec![0.0; 4]);
        let b = DocumentRecord::new("text".into(), "a.pdf".into(), vec![0.0; 4]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_search_hit_score_omitted_when_none() {
        let hit = SearchHit {
            content: "c".into(),
            source: "s.pdf".into(),
            score: None,
        };
        let json = serde_json::to_string(&hit).unwrap();
        assert!(!json.contains("score"));
    }
}
