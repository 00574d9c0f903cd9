//! Question Generation Service
//!
//! This module turns a validated topic into a full quiz. The production
//! implementation sends one completion request to an OpenAI-compatible API
//! and parses the returned text; the mock implementation returns a fixed
//! quiz for development and integration tests.

use crate::{
    llm_client::{CompletionClient, CompletionError, CompletionParams},
    prompt::PromptTemplate,
    question::{OPTION_COUNT, ParseError, QUESTION_COUNT, QuizQuestion, parse_questions},
    topic::Topic,
};
use async_openai::error::OpenAIError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why a quiz could not be generated.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The call to the completion service failed or was rejected.
    #[error("question service request failed: {0}")]
    Network(#[from] OpenAIError),
    /// The service answered without any completion text.
    #[error("question service returned an empty response")]
    EmptyResponse,
    /// The completion text did not describe a valid quiz.
    #[error("question service returned an unusable quiz: {0}")]
    Parse(#[from] ParseError),
}

impl GenerationError {
    /// Stable, user-facing category of the failure.
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            GenerationError::Network(_) => GenerationErrorKind::Network,
            GenerationError::EmptyResponse | GenerationError::Parse(_) => {
                GenerationErrorKind::Parse
            }
        }
    }
}

impl From<CompletionError> for GenerationError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Request(e) => GenerationError::Network(e),
            CompletionError::NoChoices => GenerationError::EmptyResponse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    Network,
    Parse,
}

/// Defines the contract for any service that can generate a quiz.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Generates exactly `QUESTION_COUNT` questions about `topic`.
    async fn generate_questions(&self, topic: &Topic)
    -> Result<Vec<QuizQuestion>, GenerationError>;
}

/// A `QuestionGenerator` backed by a text-completion model.
pub struct LLMQuestionGenerator {
    client: Arc<dyn CompletionClient>,
    params: CompletionParams,
    prompt: PromptTemplate,
}

impl LLMQuestionGenerator {
    /// Creates a new LLM-based question generator.
    ///
    /// # Arguments
    ///
    /// * `client` - The completion backend to send the prompt to.
    /// * `params` - Model identifier and fixed sampling parameters.
    /// * `prompt` - Template the topic is embedded into.
    pub fn new(
        client: Arc<dyn CompletionClient>,
        params: CompletionParams,
        prompt: PromptTemplate,
    ) -> Self {
        Self {
            client,
            params,
            prompt,
        }
    }
}

#[async_trait]
impl QuestionGenerator for LLMQuestionGenerator {
    async fn generate_questions(
        &self,
        topic: &Topic,
    ) -> Result<Vec<QuizQuestion>, GenerationError> {
        let prompt = self.prompt.render(topic);
        info!(topic = %topic, model = %self.params.model, "Requesting quiz generation");

        let text = self
            .client
            .complete(prompt, &self.params)
            .await
            .map_err(GenerationError::from)
            .inspect_err(|e| warn!(topic = %topic, error = %e, "Completion request failed"))?;

        if text.trim().is_empty() {
            warn!(topic = %topic, "Completion text was empty");
            return Err(GenerationError::EmptyResponse);
        }
        debug!(topic = %topic, len = text.len(), "Parsing completion text");

        let questions = parse_questions(&text)
            .inspect_err(|e| warn!(topic = %topic, error = %e, "Completion did not parse as a quiz"))?;

        info!(topic = %topic, count = questions.len(), "Quiz generated");
        Ok(questions)
    }
}

/// A mock `QuestionGenerator` for development and integration testing.
///
/// Every question's correct answer is option `index % 4`, so tests can
/// pick correct and incorrect answers deterministically.
pub struct MockQuestionGenerator;

impl MockQuestionGenerator {
    pub fn quiz_for(topic: &Topic) -> Vec<QuizQuestion> {
        (0..QUESTION_COUNT)
            .map(|i| {
                let options = (0..OPTION_COUNT)
                    .map(|o| format!("{} answer {}", topic, o + 1))
                    .collect();
                // Built from fixed, in-range data.
                QuizQuestion::new(
                    format!("Question {} about {}?", i + 1, topic),
                    options,
                    i % OPTION_COUNT,
                )
            })
            .collect::<Result<_, _>>()
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuestionGenerator for MockQuestionGenerator {
    async fn generate_questions(
        &self,
        topic: &Topic,
    ) -> Result<Vec<QuizQuestion>, GenerationError> {
        Ok(Self::quiz_for(topic))
    }
}
