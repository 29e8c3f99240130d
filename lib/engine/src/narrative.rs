//! Narrative explanations for match results
//!
//! The engine renders a deterministic digest of a [`MatchResult`] into a
//! prompt and hands it to a [`NarrativeGenerator`]. Generation is slow and
//! fallible; its failure never touches the result it describes.

use crate::config::NarrativeConfig;
use crate::result::MatchResult;
use crate::{EngineError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NarrativeError {
    #[error("Narrative unavailable: no response within {0:?}")]
    Timeout(Duration),

    #[error("Narrative unavailable: request failed: {0}")]
    Request(String),

    #[error("Narrative unavailable: service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Narrative unavailable: empty response")]
    EmptyResponse,
}

/// External text generation
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, NarrativeError>;
}

/// What happened to the narrative part of an explain call
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NarrativeStatus {
    Generated { text: String },
    Unavailable { reason: String },
    /// No generator configured
    Disabled,
    /// Nothing to explain (no cross-brand matches)
    Skipped,
}

impl NarrativeStatus {
    pub fn text(&self) -> Option<&str> {
        match self {
            NarrativeStatus::Generated { text } => Some(text),
            _ => None,
        }
    }
}

/// One digest line per neighbor: `- (brand, product type, capacityL, grade)`
pub fn render_digest(result: &MatchResult) -> String {
    let mut digest = String::new();
    for row in &result.rows {
        let capacity = row
            .capacity
            .map(|c| format!("{}L", c))
            .unwrap_or_else(|| "-".to_string());
        digest.push_str(&format!(
            "- ({}, {}, {}, {})\n",
            row.brand.as_deref().unwrap_or("-"),
            row.product_type.as_deref().unwrap_or("-"),
            capacity,
            row.energy_grade.as_deref().unwrap_or("-"),
        ));
    }
    digest
}

/// Full prompt sent to the generator
pub fn render_prompt(query_id: &str, result: &MatchResult) -> String {
    format!(
        "Reference model: {}\n\
         Similar models:\n{}\n\
         Summarize in at most three lines why these competing-brand models are \
         similar to the reference model, based on their key specifications.",
        query_id,
        render_digest(result)
    )
}

/// Bounds a generator with a timeout and owns prompt rendering
#[derive(Clone)]
pub struct NarrativeAdapter {
    generator: Arc<dyn NarrativeGenerator>,
    timeout: Duration,
}

impl NarrativeAdapter {
    pub fn new(generator: Arc<dyn NarrativeGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Adapter backed by a chat-completions deployment
    pub fn from_config(config: &NarrativeConfig) -> Result<Self> {
        let generator = ChatCompletionsGenerator::new(config.clone())?;
        Ok(Self::new(Arc::new(generator), config.timeout()))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn explain(
        &self,
        query_id: &str,
        result: &MatchResult,
    ) -> std::result::Result<String, NarrativeError> {
        let prompt = render_prompt(query_id, result);

        let text = tokio::time::timeout(self.timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| NarrativeError::Timeout(self.timeout))??;

        let text = text.trim();
        if text.is_empty() {
            return Err(NarrativeError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

impl std::fmt::Debug for NarrativeAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeAdapter")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Azure OpenAI style chat-completions client
pub struct ChatCompletionsGenerator {
    client: reqwest::Client,
    config: NarrativeConfig,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsGenerator {
    pub fn new(config: NarrativeConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| EngineError::InvalidConfig(format!("narrative client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }
}

#[async_trait]
impl NarrativeGenerator for ChatCompletionsGenerator {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, NarrativeError> {
        let body = json!({
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.config.temperature,
        });

        let response = self
            .client
            .post(self.url())
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NarrativeError::Timeout(self.config.timeout())
                } else {
                    NarrativeError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeError::Status {
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::Request(format!("invalid response body: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(NarrativeError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{MatchQuery, MatchRow};
    use modelmatch_schema::RepresentativeProfile;

    struct Canned(&'static str);

    #[async_trait]
    impl NarrativeGenerator for Canned {
        async fn generate(&self, _prompt: &str) -> std::result::Result<String, NarrativeError> {
            Ok(self.0.to_string())
        }
    }

    struct Stalled;

    #[async_trait]
    impl NarrativeGenerator for Stalled {
        async fn generate(&self, _prompt: &str) -> std::result::Result<String, NarrativeError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".into())
        }
    }

    fn sample_result() -> MatchResult {
        let query = RepresentativeProfile {
            model_id: "ACM-500".into(),
            brand: Some("Acme".into()),
            ..Default::default()
        };
        let rival = RepresentativeProfile {
            model_id: "ZEN-505".into(),
            brand: Some("Zen".into()),
            product_type: Some("SBS".into()),
            capacity: Some(505.0),
            energy_grade: Some("A+".into()),
            ..Default::default()
        };
        let unknown = RepresentativeProfile {
            model_id: "NOR-1".into(),
            brand: Some("Nord".into()),
            ..Default::default()
        };
        MatchResult::new(
            MatchQuery::from(&query),
            vec![MatchRow::new(&rival, 0.1), MatchRow::new(&unknown, 0.4)],
            2,
            30,
            1,
        )
    }

    #[test]
    fn test_digest_is_deterministic() {
        let digest = render_digest(&sample_result());
        assert_eq!(digest, "- (Zen, SBS, 505L, A+)\n- (Nord, -, -, -)\n");
        assert_eq!(digest, render_digest(&sample_result()));
    }

    #[test]
    fn test_prompt_names_reference_model() {
        let prompt = render_prompt("ACM-500", &sample_result());
        assert!(prompt.starts_with("Reference model: ACM-500\n"));
        assert!(prompt.contains("- (Zen, SBS, 505L, A+)"));
    }

    #[tokio::test]
    async fn test_explain_trims_generated_text() {
        let adapter = NarrativeAdapter::new(Arc::new(Canned("  Same capacity class.\n")), Duration::from_secs(1));
        let text = adapter.explain("ACM-500", &sample_result()).await.unwrap();
        assert_eq!(text, "Same capacity class.");
    }

    #[tokio::test]
    async fn test_blank_text_is_unavailable() {
        let adapter = NarrativeAdapter::new(Arc::new(Canned("   ")), Duration::from_secs(1));
        assert_eq!(
            adapter.explain("ACM-500", &sample_result()).await,
            Err(NarrativeError::EmptyResponse)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_reported() {
        let adapter = NarrativeAdapter::new(Arc::new(Stalled), Duration::from_secs(2));
        let err = adapter.explain("ACM-500", &sample_result()).await.unwrap_err();
        assert_eq!(err, NarrativeError::Timeout(Duration::from_secs(2)));
        assert!(err.to_string().starts_with("Narrative unavailable"));
    }

    #[test]
    fn test_chat_url() {
        let generator = ChatCompletionsGenerator::new(NarrativeConfig {
            endpoint: "https://example.openai.azure.com/".into(),
            deployment: "gpt-4o".into(),
            api_version: "2024-02-01".into(),
            api_key: "k".into(),
            temperature: 0.0,
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            generator.url(),
            "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-01"
        );
    }
}
