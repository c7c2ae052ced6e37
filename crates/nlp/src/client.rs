//! HTTP client for the external NLP worker service

use crate::parse::ParsedSentence;
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Default worker endpoint; override with TEXTGRAPH_NLP_URL
const DEFAULT_BASE_URL: &str = "http://localhost:8090";

/// Client for the sentence-parsing worker. The worker owns the linguistic
/// model; this side only ships text out and typed parses back.
#[derive(Clone)]
pub struct NlpClient {
    client: reqwest::Client,
    base_url: String,
}

impl NlpClient {
    /// Create a new client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Client for the local worker, honoring TEXTGRAPH_NLP_URL
    pub fn default_local() -> Self {
        let url = std::env::var("TEXTGRAPH_NLP_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check whether the worker is reachable
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Parse a document into sentences with tokens and entity spans
    #[instrument(skip(self, text))]
    pub async fn parse(&self, text: impl Into<String>) -> Result<Vec<ParsedSentence>> {
        let url = format!("{}/parse", self.base_url);
        let request = ParseRequest { text: text.into() };

        debug!("Requesting parse for {} chars", request.text.len());

        let response: ParseResponse = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Received {} parsed sentences", response.sentences.len());

        Ok(response.sentences)
    }
}

#[derive(Serialize)]
struct ParseRequest {
    text: String,
}

#[derive(Deserialize)]
struct ParseResponse {
    sentences: Vec<ParsedSentence>,
}
