//! Grok chat-completions client (OpenAI-compatible API).

use std::future::Future;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ApiKey, AppConfig};
use crate::error::RemoteApiError;

/// Something that can turn a prompt into a single completion.
pub trait ChatBackend {
    /// Send one prompt and return the assistant's reply text.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, RemoteApiError>> + Send;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the xAI Grok chat completions endpoint.
/// Holds the API key for its whole lifetime; nothing else in the process sees it.
pub struct GrokClient {
    http: reqwest::Client, // Shared connection pool
    endpoint: String,      // Full chat/completions URL
    api_key: ApiKey,       // Bearer credential
    model: String,         // Model name (e.g. grok-2)
    system_prompt: String, // Legal Eagle persona
    temperature: f32,      // Sampling temperature
}

impl GrokClient {
    /// Create a new Grok client.
    ///
    /// # Arguments
    /// * `config` - Application configuration
    /// * `api_key` - Credential loaded at startup
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AppConfig, api_key: ApiKey) -> Result<Self> {
        let endpoint = format!("{}/chat/completions", config.api_url.trim_end_matches('/'));

        info!("Using Grok endpoint {}", endpoint);
        info!("Using model: {}", config.model);

        let http = reqwest::Client::builder().timeout(config.request_timeout()).build().context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            endpoint,
            api_key,
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
        })
    }
}

impl ChatBackend for GrokClient {
    async fn complete(&self, prompt: &str) -> Result<String, RemoteApiError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage { role: "system", content: &self.system_prompt }, ChatMessage { role: "user", content: prompt }],
            temperature: self.temperature,
            stream: false,
        };

        debug!("Sending {} prompt chars to {}", prompt.chars().count(), self.endpoint);

        let response = self.http.post(&self.endpoint).bearer_auth(self.api_key.expose()).json(&request).send().await?;

        let status = response.status();
        debug!("Grok API responded with {}", status);
        match status {
            StatusCode::UNAUTHORIZED => return Err(RemoteApiError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => return Err(RemoteApiError::RateLimited),
            s if !s.is_success() => return Err(RemoteApiError::Status(s.as_u16())),
            _ => {}
        }

        let body = response.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&body).map_err(|e| RemoteApiError::Malformed(e.to_string()))?;

        first_content(parsed)
    }
}

/// Pull the first choice's text out of a completion, rejecting empty replies.
fn first_content(response: ChatResponse) -> Result<String, RemoteApiError> {
    let choice = response.choices.into_iter().next().ok_or_else(|| RemoteApiError::Malformed("no choices in response".to_string()))?;

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(RemoteApiError::Malformed("empty completion".to_string())),
    }
}
