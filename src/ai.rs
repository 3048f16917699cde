use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AppConfig;

const OPENAI_API: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_API: &str = "https://api.groq.com/openai/v1/chat/completions";

pub const DEFAULT_MODEL: &str = "groq-llama3";

/// A fully-resolved translation request: defaults already applied, text
/// already validated.
#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    pub style: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct GeneratedTranslation {
    pub text: String,
    pub model_used: String,
}

#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, job: &TranslationJob) -> anyhow::Result<GeneratedTranslation>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Groq,
}

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Groq => "groq",
        }
    }

    fn endpoint(self) -> &'static str {
        match self {
            Provider::OpenAi => OPENAI_API,
            Provider::Groq => GROQ_API,
        }
    }
}

/// Maps a stored model identifier (the `models` reference-table value) to the
/// provider and the provider-side chat model.
pub fn route_model(value: &str) -> Option<(Provider, &'static str)> {
    match value {
        "groq-llama3" => Some((Provider::Groq, "llama3-8b-8192")),
        "openai-gpt-4" => Some((Provider::OpenAi, "gpt-4")),
        "openai-gpt-3.5" => Some((Provider::OpenAi, "gpt-3.5-turbo")),
        _ => None,
    }
}

pub fn build_system_prompt(source_language: &str, target_language: &str, style: &str) -> String {
    let style_line = match style {
        "casual" => "Translate the following text in a casual, conversational tone.",
        "technical" => {
            "Translate the following text maintaining technical accuracy and terminology."
        }
        "creative" => {
            "Translate the following text in a creative, expressive way while maintaining meaning."
        }
        _ => "Translate the following text in a formal, professional tone.",
    };
    let source_line = if source_language == "auto" {
        "Detect the source language automatically.".to_string()
    } else {
        format!("The source language is {source_language}.")
    };
    format!(
        "You are a professional translator. {style_line} {source_line} \
         The target language is {target_language}. \
         Provide only the translation without any additional commentary or explanation. \
         Maintain the original formatting and structure of the text."
    )
}

fn temperature_for(style: &str) -> f32 {
    if style == "creative" {
        0.7
    } else {
        0.3
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client for both providers; Groq exposes an
/// OpenAI-compatible API so a single request shape covers the two.
pub struct AiService {
    http: Client,
    openai_api_key: String,
    groq_api_key: String,
}

impl AiService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            openai_api_key: config.openai_api_key.clone(),
            groq_api_key: config.groq_api_key.clone(),
        }
    }

    fn api_key(&self, provider: Provider) -> &str {
        match provider {
            Provider::OpenAi => &self.openai_api_key,
            Provider::Groq => &self.groq_api_key,
        }
    }
}

#[async_trait]
impl TranslationBackend for AiService {
    async fn translate(&self, job: &TranslationJob) -> anyhow::Result<GeneratedTranslation> {
        let (provider, chat_model) = route_model(&job.model)
            .ok_or_else(|| anyhow::anyhow!("Unknown model '{}'", job.model))?;

        let system = build_system_prompt(&job.source_language, &job.target_language, &job.style);
        let request = ChatRequest {
            model: chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: &job.text,
                },
            ],
            max_tokens: 2000,
            temperature: temperature_for(&job.style),
        };

        debug!(provider = provider.name(), model = chat_model, "requesting translation");

        let response = self
            .http
            .post(provider.endpoint())
            .bearer_auth(self.api_key(provider))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!("Failed to get translation from {}: {e}", provider.name())
            })?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!(
                "Failed to get translation from {}: status {status}",
                provider.name()
            );
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            anyhow::anyhow!("Failed to get translation from {}: {e}", provider.name())
        })?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Failed to get translation from {}: empty completion",
                    provider.name()
                )
            })?;

        Ok(GeneratedTranslation {
            text,
            model_used: job.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_known_models() {
        assert_eq!(route_model("groq-llama3"), Some((Provider::Groq, "llama3-8b-8192")));
        assert_eq!(route_model("openai-gpt-4"), Some((Provider::OpenAi, "gpt-4")));
        assert_eq!(
            route_model("openai-gpt-3.5"),
            Some((Provider::OpenAi, "gpt-3.5-turbo"))
        );
        assert_eq!(route_model("claude-opus"), None);
    }

    #[test]
    fn prompt_names_languages_and_style() {
        let prompt = build_system_prompt("en", "es", "formal");
        assert!(prompt.contains("The source language is en."));
        assert!(prompt.contains("The target language is es."));
        assert!(prompt.contains("formal, professional tone"));
        assert!(prompt.contains("only the translation"));
    }

    #[test]
    fn prompt_asks_for_detection_when_source_is_auto() {
        let prompt = build_system_prompt("auto", "fr", "casual");
        assert!(prompt.contains("Detect the source language automatically."));
        assert!(!prompt.contains("The source language is auto"));
        assert!(prompt.contains("casual, conversational tone"));
    }

    #[test]
    fn creative_style_raises_temperature() {
        assert_eq!(temperature_for("creative"), 0.7);
        assert_eq!(temperature_for("formal"), 0.3);
        assert_eq!(temperature_for("technical"), 0.3);
    }
}
