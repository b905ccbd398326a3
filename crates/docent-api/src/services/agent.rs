//! Query processor: an explicit tool-calling loop over the chat backend.
//!
//! The model is offered a single tool, internal knowledge search. Tool
//! execution and the loop itself live here rather than in any SDK: send
//! the history, inspect the response for a tool call, execute it, append
//! the tool result, resend — repeated up to a fixed iteration cap.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use docent_core::{
    defaults::{MAX_TOOL_TURNS, SEARCH_TOP_K},
    ChatBackend, ChatOutcome, ChatTurn, EmbeddingBackend, Error, Result, ToolSpec, VectorIndex,
};

/// Name of the knowledge search tool as exposed to the model.
pub const SEARCH_TOOL_NAME: &str = "search_internal_knowledge";

/// Tool result returned when the search finds nothing.
pub const NO_RESULTS_SENTINEL: &str = "No relevant documents found.";

/// Fixed instruction prepended to the user query.
const SYSTEM_INSTRUCTION: &str = "You are a helpful AI assistant. Always cite your sources in the format [Source: filename]. If you use the search tool, base your answer primarily on the returned context.";

/// Result of processing a query.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    /// Final answer text.
    pub response: String,
    /// Distinct source filenames retrieved by tool calls, in retrieval order.
    pub sources: Vec<String>,
}

/// Stateless per-request query processor.
pub struct QueryProcessor {
    embedder: Arc<dyn EmbeddingBackend>,
    chat: Arc<dyn ChatBackend>,
    index: Arc<dyn VectorIndex>,
}

impl QueryProcessor {
    pub fn new(
        embedder: Arc<dyn EmbeddingBackend>,
        chat: Arc<dyn ChatBackend>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            embedder,
            chat,
            index,
        }
    }

    /// Declaration of the knowledge search tool.
    fn search_tool_spec() -> ToolSpec {
        ToolSpec {
            name: SEARCH_TOOL_NAME.to_string(),
            description: "Search the internal knowledge base for relevant documents. \
                          Use this tool when you need to answer questions based on uploaded files."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    /// Process a user query, running the tool loop to completion.
    pub async fn process(&self, user_query: &str) -> Result<AgentReply> {
        let tools = [Self::search_tool_spec()];
        let mut history = vec![ChatTurn::User {
            text: format!("{}\n\nUser Query: {}", SYSTEM_INSTRUCTION, user_query),
        }];
        let mut sources: Vec<String> = Vec::new();

        for turn in 0..MAX_TOOL_TURNS {
            match self.chat.chat(&history, &tools).await? {
                ChatOutcome::Text(text) => {
                    debug!(turns = turn + 1, sources = sources.len(), "Query answered");
                    return Ok(AgentReply {
                        response: text,
                        sources,
                    });
                }
                ChatOutcome::ToolCall { name, arguments } => {
                    history.push(ChatTurn::ModelToolCall {
                        name: name.clone(),
                        arguments: arguments.clone(),
                    });

                    let content = if name == SEARCH_TOOL_NAME {
                        match arguments.get("query").and_then(|v| v.as_str()) {
                            Some(query) => {
                                self.search_internal_knowledge(query, &mut sources).await?
                            }
                            None => {
                                warn!("Tool call was missing the 'query' argument");
                                "Tool call was missing the required 'query' argument.".to_string()
                            }
                        }
                    } else {
                        warn!(tool = %name, "Model requested an unknown tool");
                        format!("Unknown tool: {}", name)
                    };

                    history.push(ChatTurn::ToolResult { name, content });
                }
            }
        }

        Err(Error::Inference(format!(
            "Tool loop exceeded {} turns without a final answer",
            MAX_TOOL_TURNS
        )))
    }

    /// The knowledge search tool: query-mode embedding, hybrid search,
    /// hits formatted as Content/Source blocks.
    async fn search_internal_knowledge(
        &self,
        query: &str,
        sources: &mut Vec<String>,
    ) -> Result<String> {
        info!(query, "Searching internal knowledge");

        let vector = self.embedder.embed_query(query).await?;
        let hits = self.index.search(query, &vector, SEARCH_TOP_K).await?;

        if hits.is_empty() {
            return Ok(NO_RESULTS_SENTINEL.to_string());
        }

        for hit in &hits {
            if !sources.contains(&hit.source) {
                sources.push(hit.source.clone());
            }
        }

        Ok(hits
            .iter()
            .map(|hit| format!("Content: {}\nSource: {}", hit.content, hit.source))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}
