//! Question Generation Prompt
//!
//! The completion endpoint receives a single instruction string. The
//! template spells out the JSON shape that `question::parse_questions`
//! accepts, and embeds the topic through a `{topic}` placeholder.

use crate::topic::Topic;
use std::path::Path;

/// Placeholder replaced by the topic text.
pub const TOPIC_PLACEHOLDER: &str = "{topic}";

/// File name looked up inside a prompts directory.
pub const PROMPT_FILE: &str = "generate_questions.md";

pub const DEFAULT_TEMPLATE: &str = r#"Generate a JSON array of 10 multiple-choice questions with 4 options and 1 correct answer based on the following topic: {topic}
Respond with the JSON array only, using this format:
[
  {
    "question": "",
    "options": [
      "",
      "",
      "",
      ""
    ],
    "correct_answer": 0
  }
]
"correct_answer" is the zero-based index of the correct option.
"#;

/// A prompt template with a `{topic}` placeholder.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("prompt template does not contain the {placeholder} placeholder", placeholder = TOPIC_PLACEHOLDER)]
    MissingPlaceholder,
    #[error("failed to read prompt template: {0}")]
    Io(#[from] std::io::Error),
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, PromptError> {
        let template = template.into();
        if !template.contains(TOPIC_PLACEHOLDER) {
            return Err(PromptError::MissingPlaceholder);
        }
        Ok(Self { template })
    }

    /// Loads `generate_questions.md` from `dir`, falling back to the built-in
    /// template when the file does not exist.
    pub fn load_or_default(dir: &Path) -> Result<Self, PromptError> {
        let path = dir.join(PROMPT_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        Self::new(std::fs::read_to_string(path)?)
    }

    pub fn render(&self, topic: &Topic) -> String {
        self.template.replace(TOPIC_PLACEHOLDER, topic.as_str())
    }
}
