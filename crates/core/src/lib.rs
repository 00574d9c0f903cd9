pub mod generator;
pub mod llm_client;
pub mod presenter;
pub mod prompt;
pub mod question;
pub mod session;
pub mod topic;

pub use generator::{GenerationError, QuestionGenerator};
pub use question::QuizQuestion;
pub use session::QuizSession;
pub use topic::Topic;
