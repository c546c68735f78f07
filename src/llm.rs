use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use focus_reco::config::GeneratorConfig;
use focus_reco::generator::{ChatMessage, TextGenerator};

// Client for an Ollama-compatible /api/generate endpoint. The chat roles are
// flattened into one labeled prompt because that endpoint takes a single
// string.
#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| format!("failed to build generator client: {}", err))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        })
    }
}

#[derive(Serialize)]
struct GenerateOptions {
    num_ctx: u32,
    top_p: f64,
    top_k: u32,
    repeat_penalty: f64,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    temperature: f64,
    options: GenerateOptions,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

fn flatten_messages(messages: &[ChatMessage]) -> String {
    let mut prompt = String::new();
    for message in messages {
        let header = match message {
            ChatMessage::System(_) => "### System",
            ChatMessage::User(_) => "### User",
            ChatMessage::Assistant(_) => "### Assistant",
        };
        prompt.push_str(header);
        prompt.push('\n');
        prompt.push_str(message.text().trim());
        prompt.push_str("\n\n");
    }
    prompt
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, messages: &[ChatMessage], temperature: f64) -> Result<String, String> {
        let url = format!("{}/api/generate", self.endpoint.trim_end_matches('/'));
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: flatten_messages(messages),
            temperature,
            options: GenerateOptions {
                num_ctx: 4096,
                top_p: 0.9,
                top_k: 40,
                repeat_penalty: 1.12,
            },
            stream: false,
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| format!("generator request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = body.trim();
            if detail.is_empty() {
                return Err(format!("generator error: {}", status));
            }
            return Err(format!("generator error: {} {}", status, detail));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|err| format!("generator response parse failed: {}", err))?;

        Ok(body.response.trim().to_string())
    }
}
