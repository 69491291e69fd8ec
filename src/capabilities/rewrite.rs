//! Remote rewrite capability over hosted LLM backends
//!
//! Blocking HTTP via ureq — no async runtime needed. A rewrite request is
//! tried against an ordered list of `(backend, model)` pairs, each bounded
//! by a timeout, stopping at the first success; if every backend fails the
//! caller gets one aggregated error, which the pipeline engine treats as a
//! single isolated operator failure.

use crate::capabilities::first_success;
use crate::error::CapabilityError;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Supported rewrite backends. Both speak the OpenAI-compatible chat
/// completions protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewriteBackend {
    #[default]
    OpenRouter,
    Ollama,
}

impl RewriteBackend {
    pub fn env_key(&self) -> &'static str {
        match self {
            RewriteBackend::OpenRouter => "OPENROUTER_API_KEY",
            RewriteBackend::Ollama => "OLLAMA_MODEL",
        }
    }

    pub fn api_url(&self) -> &'static str {
        match self {
            RewriteBackend::OpenRouter => "https://openrouter.ai/api/v1/chat/completions",
            RewriteBackend::Ollama => "http://localhost:11434/v1/chat/completions",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, RewriteBackend::Ollama)
    }
}

impl std::fmt::Display for RewriteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewriteBackend::OpenRouter => write!(f, "openrouter"),
            RewriteBackend::Ollama => write!(f, "ollama"),
        }
    }
}

/// One entry in the fallback chain.
#[derive(Debug, Clone)]
pub struct BackendSpec {
    pub backend: RewriteBackend,
    pub model: String,
}

impl std::fmt::Display for BackendSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.backend, self.model)
    }
}

/// Default model chain on OpenRouter, best writer first.
pub const DEFAULT_REWRITE_MODELS: &[&str] = &[
    "anthropic/claude-3.5-sonnet",
    "google/gemini-2.0-flash-exp:free",
];

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.9;

/// Remote rewrite client with an ordered backend chain.
pub struct RemoteRewriter {
    backends: Vec<BackendSpec>,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // status codes handled below
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl RemoteRewriter {
    pub fn new(backends: Vec<BackendSpec>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            backends,
            api_key: api_key.into(),
            agent: make_agent(timeout),
        }
    }

    /// Build from the environment with the default OpenRouter chain.
    /// Fails with `MissingApiKey` when no backend is usable, which callers
    /// treat as "capability unavailable" and degrade.
    pub fn from_env() -> Result<Self, CapabilityError> {
        Self::from_env_with_models(DEFAULT_REWRITE_MODELS, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn from_env_with_models(
        models: &[impl AsRef<str>],
        timeout: Duration,
    ) -> Result<Self, CapabilityError> {
        let backends: Vec<BackendSpec> = models
            .iter()
            .map(|m| BackendSpec {
                backend: RewriteBackend::OpenRouter,
                model: m.as_ref().to_string(),
            })
            .collect();

        let env_key = RewriteBackend::OpenRouter.env_key();
        let api_key = env::var(env_key).map_err(|_| CapabilityError::MissingApiKey {
            env_var: env_key.to_string(),
        })?;

        Ok(Self::new(backends, api_key, timeout))
    }

    pub fn backends(&self) -> &[BackendSpec] {
        &self.backends
    }

    /// Rewrite `text` under `system_instruction`, trying each backend in
    /// order.
    pub fn rewrite(&self, system_instruction: &str, text: &str) -> Result<String, CapabilityError> {
        first_success("rewrite", &self.backends, |spec| {
            self.call_backend(spec, system_instruction, text)
        })
    }

    fn call_backend(
        &self,
        spec: &BackendSpec,
        system_instruction: &str,
        text: &str,
    ) -> Result<String, CapabilityError> {
        let body = ChatRequest {
            model: spec.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_instruction.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: text.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let mut req = self
            .agent
            .post(spec.backend.api_url())
            .header("Content-Type", "application/json");

        if spec.backend.requires_api_key() {
            req = req.header("Authorization", &format!("Bearer {}", self.api_key));
        }

        let response = req
            .send_json(&body)
            .map_err(|e| CapabilityError::RequestFailed {
                backend: spec.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            return Err(CapabilityError::ApiError {
                backend: spec.to_string(),
                status,
                message: truncate(&error_text, 200),
            });
        }

        let resp: ChatResponse = response
            .into_body()
            .read_json()
            .map_err(|e| CapabilityError::ParseError(e.to_string()))?;

        let content = resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CapabilityError::ParseError("no response choices".to_string()))?;

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(CapabilityError::ParseError("empty completion".to_string()));
        }
        Ok(content)
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_spec_display() {
        let spec = BackendSpec {
            backend: RewriteBackend::OpenRouter,
            model: "anthropic/claude-3.5-sonnet".to_string(),
        };
        assert_eq!(spec.to_string(), "openrouter/anthropic/claude-3.5-sonnet");
    }

    #[test]
    fn test_ollama_needs_no_key() {
        assert!(!RewriteBackend::Ollama.requires_api_key());
        assert!(RewriteBackend::OpenRouter.requires_api_key());
    }

    #[test]
    fn test_default_chain_order() {
        assert_eq!(DEFAULT_REWRITE_MODELS.len(), 2);
        assert!(DEFAULT_REWRITE_MODELS[0].starts_with("anthropic/"));
    }
}
