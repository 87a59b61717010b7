use std::time::Duration;

use error_stack::{Report, ResultExt};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::llm::TextGenerator;

// Transport failures are retried once; HTTP and parse failures are not
const MAX_ATTEMPTS: usize = 2;
const RETRY_DELAY_SECS: u64 = 2;

/// Client for an OpenAI-compatible chat-completions endpoint (OpenRouter).
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenRouterClient {
    /// Build a client from config, reading the API key from the environment
    /// variable the config names.
    pub fn from_config(config: &LlmConfig) -> Result<Self, Report<LlmError>> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            Report::new(LlmError::MissingApiKey {
                var: config.api_key_env.clone(),
            })
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .change_context(LlmError::Request)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    async fn request_once(&self, prompt: &str) -> Result<String, Report<LlmError>> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .change_context(LlmError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Report::new(LlmError::Http {
                status: status.as_u16(),
            }));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .change_context(LlmError::ResponseParse)?;

        content_from_response(chat)
    }
}

impl TextGenerator for OpenRouterClient {
    fn generate(&self, prompt: &str) -> BoxFuture<'_, Result<String, Report<LlmError>>> {
        let prompt = prompt.to_owned();
        Box::pin(async move {
            let mut attempt = 1;
            loop {
                match self.request_once(&prompt).await {
                    Ok(text) => {
                        debug!(model = %self.model, chars = text.len(), "completion received");
                        return Ok(text);
                    }
                    Err(report) => {
                        let transport = matches!(report.current_context(), LlmError::Request);
                        if !transport || attempt >= MAX_ATTEMPTS {
                            return Err(report);
                        }
                        warn!(attempt, error = ?report, "transport failure, retrying");
                        attempt += 1;
                        sleep(Duration::from_secs(RETRY_DELAY_SECS)).await;
                    }
                }
            }
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageBody,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    content: Option<String>,
}

fn content_from_response(response: ChatResponse) -> Result<String, Report<LlmError>> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| Report::new(LlmError::EmptyResponse))
}
