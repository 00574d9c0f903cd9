use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{CreateCompletionRequestArgs, CreateCompletionResponse},
};
use async_trait::async_trait;
use tracing::debug;

/// Default model for the legacy completions endpoint.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-instruct";

/// Fixed sampling parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub n: u8,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2048,
            temperature: 0.7,
            n: 1,
        }
    }
}

impl CompletionParams {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(#[from] OpenAIError),
    #[error("completion response contained no choices")]
    NoChoices,
}

/// A text-completion backend: one prompt in, one block of text out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        prompt: String,
        params: &CompletionParams,
    ) -> Result<String, CompletionError>;
}

/// An implementation of `CompletionClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::with_config(config),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAICompatibleClient {
    async fn complete(
        &self,
        prompt: String,
        params: &CompletionParams,
    ) -> Result<String, CompletionError> {
        let request = CreateCompletionRequestArgs::default()
            .model(&params.model)
            .prompt(prompt)
            .max_tokens(params.max_tokens)
            .temperature(params.temperature)
            .n(params.n)
            .build()?;

        let response: CreateCompletionResponse = self.client.completions().create(request).await?;
        debug!(
            choices = response.choices.len(),
            usage = ?response.usage,
            "Completion response received"
        );

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or(CompletionError::NoChoices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = CompletionParams::default();
        assert_eq!(params.model, "gpt-3.5-turbo-instruct");
        assert_eq!(params.max_tokens, 2048);
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.n, 1);
    }

    #[test]
    fn test_with_model_keeps_sampling_defaults() {
        let params = CompletionParams::with_model("davinci-002");
        assert_eq!(params.model, "davinci-002");
        assert_eq!(params.max_tokens, 2048);
        assert_eq!(params.n, 1);
    }
}
