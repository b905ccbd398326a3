//! Mock inference backends for deterministic testing.
//!
//! Provides mock implementations of [`EmbeddingBackend`] and
//! [`ChatBackend`] that produce deterministic embeddings and scripted chat
//! outcomes, and record every call for assertion.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use docent_core::{ChatBackend, ChatOutcome, ChatTurn, EmbeddingBackend, Error, Result, ToolSpec};

/// Task type recorded for an embedding call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedTask {
    Query,
    Document,
}

/// A recorded embedding call.
#[derive(Debug, Clone)]
pub struct EmbedCall {
    pub task: EmbedTask,
    pub text: String,
}

/// Deterministic mock embedding backend.
///
/// Vectors are derived from an FNV-1a hash of the input text, so equal
/// inputs always embed identically.
#[derive(Clone)]
pub struct MockEmbeddingBackend {
    dimension: usize,
    failure: Option<String>,
    calls: Arc<Mutex<Vec<EmbedCall>>>,
}

impl MockEmbeddingBackend {
    /// Create a mock producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every embedding call fail with the given message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<EmbedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Total number of embedding calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of query-mode embedding calls.
    pub fn query_call_count(&self) -> usize {
        self.count(EmbedTask::Query)
    }

    /// Number of document-mode embedding calls.
    pub fn document_call_count(&self) -> usize {
        self.count(EmbedTask::Document)
    }

    fn count(&self, task: EmbedTask) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.task == task)
            .count()
    }

    fn embed(&self, text: &str, task: EmbedTask) -> Result<Vec<f32>> {
        self.calls.lock().unwrap().push(EmbedCall {
            task,
            text: text.to_string(),
        });

        if let Some(msg) = &self.failure {
            return Err(Error::Embedding(msg.clone()));
        }

        Ok(vector_for(text, self.dimension))
    }
}

/// Derive a deterministic vector from text.
fn vector_for(text: &str, dimension: usize) -> Vec<f32> {
    let mut state: u64 = 0xcbf2_9ce4_8422_2325;
    for b in text.bytes() {
        state ^= u64::from(b);
        state = state.wrapping_mul(0x0000_0100_0000_01b3);
    }
    (0..dimension)
        .map(|i| {
            let v = state
                .wrapping_add(i as u64)
                .wrapping_mul(0x9e37_79b9_7f4a_7c15);
            ((v >> 40) as f32 / (1u32 << 24) as f32) - 0.5
        })
        .collect()
}

#[async_trait]
impl EmbeddingBackend for MockEmbeddingBackend {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(text, EmbedTask::Query)
    }

    async fn embed_document(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(text, EmbedTask::Document)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embedding"
    }
}

/// A scripted step for the mock chat backend.
#[derive(Debug, Clone)]
enum ScriptStep {
    Outcome(ChatOutcome),
    Error(String),
}

/// Mock chat backend that replays a scripted sequence of outcomes.
///
/// Each `chat` call consumes the next step and records the history it was
/// given. An exhausted script is an error, which makes runaway tool loops
/// fail loudly in tests.
#[derive(Clone, Default)]
pub struct MockChatBackend {
    script: Arc<Mutex<VecDeque<ScriptStep>>>,
    histories: Arc<Mutex<Vec<Vec<ChatTurn>>>>,
}

impl MockChatBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome to the script.
    pub fn with_outcome(self, outcome: ChatOutcome) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptStep::Outcome(outcome));
        self
    }

    /// Append a failure to the script.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptStep::Error(message.into()));
        self
    }

    /// Histories received so far, one per `chat` call.
    pub fn histories(&self) -> Vec<Vec<ChatTurn>> {
        self.histories.lock().unwrap().clone()
    }

    /// Number of `chat` calls made.
    pub fn call_count(&self) -> usize {
        self.histories.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn chat(&self, history: &[ChatTurn], _tools: &[ToolSpec]) -> Result<ChatOutcome> {
        self.histories.lock().unwrap().push(history.to_vec());

        match self.script.lock().unwrap().pop_front() {
            Some(ScriptStep::Outcome(outcome)) => Ok(outcome),
            Some(ScriptStep::Error(msg)) => Err(Error::Inference(msg)),
            None => Err(Error::Inference("Mock chat script exhausted".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock-chat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_embedding_is_deterministic() {
        let mock = MockEmbeddingBackend::new(8);
        let a = mock.embed_query("same text").await.unwrap();
        let b = mock.embed_query("same text").await.unwrap();
        let c = mock.embed_query("other text").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 8);
        assert_eq!(mock.query_call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_embedding_distinguishes_task_types() {
        let mock = MockEmbeddingBackend::new(4);
        mock.embed_query("q").await.unwrap();
        mock.embed_document("d").await.unwrap();
        assert_eq!(mock.query_call_count(), 1);
        assert_eq!(mock.document_call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_embedding_failure() {
        let mock = MockEmbeddingBackend::new(4).with_failure("boom");
        let err = mock.embed_document("d").await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        // Failed calls are still recorded.
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_chat_replays_script_in_order() {
        let mock = MockChatBackend::new()
            .with_outcome(ChatOutcome::ToolCall {
                name: "search_internal_knowledge".to_string(),
                arguments: serde_json::json!({"query": "q"}),
            })
            .with_outcome(ChatOutcome::Text("answer".to_string()));

        let history = vec![ChatTurn::User {
            text: "hello".to_string(),
        }];
        let first = mock.chat(&history, &[]).await.unwrap();
        assert!(matches!(first, ChatOutcome::ToolCall { .. }));
        let second = mock.chat(&history, &[]).await.unwrap();
        assert_eq!(second, ChatOutcome::Text("answer".to_string()));

        // Exhausted script errors out.
        assert!(mock.chat(&history, &[]).await.is_err());
        assert_eq!(mock.call_count(), 3);
    }
}
