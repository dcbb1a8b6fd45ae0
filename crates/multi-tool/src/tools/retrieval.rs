use std::time::Duration;

use anyhow::Result;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::config::Config;
use crate::engine::utils::{check_status, http_client, API_VERSION, REQUEST_TIMEOUT};
use crate::tool::{string_arg, ToolResult};

pub const NAME: &str = "rag_retrieval";
pub const DESCRIPTION: &str =
    "Retrieve passages from the Vertex AI RAG corpus for grounded answers.";

/// Kept small for precision.
pub const SIMILARITY_TOP_K: usize = 5;

/// A passage returned by the corpus.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passage {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub source_uri: Option<String>,
    #[serde(default)]
    pub source_display_name: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl Passage {
    fn source(&self) -> Option<&str> {
        self.source_display_name
            .as_deref()
            .or(self.source_uri.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
struct RetrieveContextsResponse {
    #[serde(default)]
    contexts: Option<Contexts>,
}

#[derive(Debug, Default, Deserialize)]
struct Contexts {
    #[serde(default)]
    contexts: Vec<Passage>,
}

/// Retrieval tool bound to one remote RAG corpus.
///
/// Building it only records where the corpus lives; the first request is made
/// when the tool is called.
#[derive(Debug)]
pub struct RagRetrieval {
    pub name: String,
    pub description: String,
    pub corpus: String,
    pub top_k: usize,
    project_id: String,
    region: String,
    endpoint: String,
    access_token: Option<String>,
    timeout: Option<Duration>,
    client: Client,
}

impl RagRetrieval {
    pub fn new(config: &Config, corpus: &str) -> Result<Self> {
        Ok(Self {
            name: NAME.to_string(),
            description: DESCRIPTION.to_string(),
            corpus: corpus.to_string(),
            top_k: SIMILARITY_TOP_K,
            project_id: config.project_id.clone(),
            region: config.rag_region.clone(),
            endpoint: config.endpoint(&config.rag_region),
            access_token: config.access_token.clone(),
            timeout: REQUEST_TIMEOUT,
            client: http_client()?,
        })
    }

    /// Request timeout of the underlying client, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn declaration(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": {
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The query to retrieve."
                    }
                },
                "required": ["query"]
            },
            "retrieval": {
                "vertexRagStore": {
                    "ragResources": [{ "ragCorpus": self.corpus }],
                    "similarityTopK": self.top_k,
                }
            }
        })
    }

    /// Fetch the most relevant passages for `query`, at most `top_k` of them.
    pub fn retrieve(&self, query: &str) -> Result<Vec<Passage>> {
        let url = format!(
            "{}/{}/projects/{}/locations/{}:retrieveContexts",
            self.endpoint, API_VERSION, self.project_id, self.region
        );
        let payload = json!({
            "vertexRagStore": {
                "ragResources": [{ "ragCorpus": self.corpus }],
            },
            "query": {
                "text": query,
                "ragRetrievalConfig": { "topK": self.top_k },
            },
        });

        let token = auth::access_token(self.access_token.as_deref())?;
        tracing::debug!(corpus = %self.corpus, "retrieving contexts");
        let response = self
            .client
            .post(&url)
            .header("Authorization", auth::bearer(&token))
            .json(&payload)
            .send()?;
        let response: RetrieveContextsResponse = check_status(response)?.json()?;

        let mut passages = response.contexts.unwrap_or_default().contexts;
        passages.truncate(self.top_k);
        Ok(passages)
    }

    pub fn call(&self, args: &Value) -> Result<Value> {
        let query = string_arg(args, "query")?;
        let passages = self.retrieve(query)?;
        Ok(self.report(&passages).to_value())
    }

    fn report(&self, passages: &[Passage]) -> ToolResult {
        if passages.is_empty() {
            return ToolResult::success(format!(
                "No matching result found with the config: {}",
                self.corpus
            ));
        }

        let report = passages
            .iter()
            .map(|passage| match passage.source() {
                Some(source) => format!("[{}] {}", source, passage.text),
                None => passage.text.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        ToolResult::success(report)
    }
}
