//! Quiz Session Controller
//!
//! A `QuizSession` is one topic-to-summary attempt. It owns the generated
//! questions, the current position and the score, and it is the single
//! authority on scoring: every question can be answered once.
//!
//! Generation is split into `begin` and `finish_generation` so that callers
//! can release whatever lock guards the session while the request is in
//! flight.

use crate::{
    generator::{GenerationError, GenerationErrorKind},
    question::QuizQuestion,
    topic::{Topic, TopicError},
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Waiting for a topic.
    Idle,
    /// A generation request is outstanding.
    Generating,
    /// Questions are loaded and the quiz is in progress.
    Presenting,
    /// The final question has been answered; only a reset is left.
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidTopic(#[from] TopicError),
    #[error("a quiz is already in progress")]
    Busy,
    #[error("no generation request is outstanding")]
    NotGenerating,
    #[error("question {index} does not exist")]
    QuestionOutOfRange { index: usize },
    #[error("question {index} has no option {choice}")]
    ChoiceOutOfRange { index: usize, choice: usize },
    #[error("question {index} has already been answered")]
    AlreadyAnswered { index: usize },
}

/// The latest generation failure, kept so the topic form can explain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationFailure {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl From<&GenerationError> for GenerationFailure {
    fn from(err: &GenerationError) -> Self {
        let message = match err.kind() {
            GenerationErrorKind::Network => {
                "Could not reach the question service. Please try again."
            }
            GenerationErrorKind::Parse => {
                "The question service returned a quiz we could not read. Please try again."
            }
        };
        Self {
            kind: err.kind(),
            message: message.to_string(),
        }
    }
}

/// Result of scoring one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub index: usize,
    pub choice: usize,
    pub correct: bool,
    pub correct_answer: usize,
}

/// Running tally shown above the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Scoreboard {
    pub total: usize,
    pub correct: u32,
    pub incorrect: u32,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    phase: SessionPhase,
    topic: Option<Topic>,
    questions: Vec<QuizQuestion>,
    answers: Vec<Option<usize>>,
    current_index: usize,
    correct_count: u32,
    incorrect_count: u32,
    last_error: Option<GenerationFailure>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            topic: None,
            questions: Vec::new(),
            answers: Vec::new(),
            current_index: 0,
            correct_count: 0,
            incorrect_count: 0,
            last_error: None,
        }
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submits a topic and enters `Generating`.
    ///
    /// Clears any earlier questions, answers, score and error. The caller is
    /// expected to run the generation request for the returned topic and
    /// report its result through [`QuizSession::finish_generation`].
    pub fn begin(&mut self, topic: &str) -> Result<Topic, SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(SessionError::Busy);
        }
        let topic = Topic::parse(topic)?;

        *self = Self {
            phase: SessionPhase::Generating,
            topic: Some(topic.clone()),
            ..Self::default()
        };
        info!(topic = %topic, "Topic submitted");
        Ok(topic)
    }

    /// Stores the outcome of the generation request.
    ///
    /// On failure the question list stays empty, the counters are untouched
    /// and the session goes back to `Idle` so the user can resubmit.
    pub fn finish_generation(
        &mut self,
        result: Result<Vec<QuizQuestion>, GenerationError>,
    ) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Generating {
            return Err(SessionError::NotGenerating);
        }
        match result {
            Ok(questions) if !questions.is_empty() => {
                info!(count = questions.len(), "Quiz loaded");
                self.answers = vec![None; questions.len()];
                self.questions = questions;
                self.current_index = 0;
                self.phase = SessionPhase::Presenting;
            }
            Ok(_) => {
                warn!("Generation produced no questions");
                self.fail(&GenerationError::EmptyResponse);
            }
            Err(err) => {
                warn!(error = %err, "Error generating quiz");
                self.fail(&err);
            }
        }
        Ok(())
    }

    fn fail(&mut self, err: &GenerationError) {
        self.phase = SessionPhase::Idle;
        self.questions.clear();
        self.answers.clear();
        self.last_error = Some(GenerationFailure::from(err));
    }

    /// Scores `choice` for question `index`.
    ///
    /// Each index is scored exactly once; a repeated answer is rejected and
    /// leaves the counters unchanged.
    pub fn answer(&mut self, index: usize, choice: usize) -> Result<AnswerOutcome, SessionError> {
        let question = self
            .questions
            .get(index)
            .ok_or(SessionError::QuestionOutOfRange { index })?;
        if choice >= question.options().len() {
            return Err(SessionError::ChoiceOutOfRange { index, choice });
        }
        if self.answers[index].is_some() {
            return Err(SessionError::AlreadyAnswered { index });
        }

        let correct = question.is_correct(choice);
        let correct_answer = question.correct_answer();
        self.answers[index] = Some(choice);
        if correct {
            self.correct_count += 1;
        } else {
            self.incorrect_count += 1;
        }
        if self.is_final_question() && index == self.current_index {
            self.phase = SessionPhase::Complete;
        }
        debug!(index, choice, correct, "Answer scored");

        Ok(AnswerOutcome {
            index,
            choice,
            correct,
            correct_answer,
        })
    }

    /// Moves to the next question. Returns `false`, changing nothing, when
    /// there is no next question.
    pub fn advance(&mut self) -> bool {
        if self.phase != SessionPhase::Presenting || self.is_final_question() {
            return false;
        }
        self.current_index += 1;
        // The final question may have been answered before it was reached.
        if self.is_final_question() && self.answers[self.current_index].is_some() {
            self.phase = SessionPhase::Complete;
        }
        true
    }

    /// Discards the whole session and returns to topic entry.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_index)
    }

    /// The recorded choice for `index`, if it has been answered.
    pub fn answer_for(&self, index: usize) -> Option<usize> {
        self.answers.get(index).copied().flatten()
    }

    pub fn is_final_question(&self) -> bool {
        !self.questions.is_empty() && self.current_index + 1 == self.questions.len()
    }

    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard {
            total: self.questions.len(),
            correct: self.correct_count,
            incorrect: self.incorrect_count,
        }
    }

    pub fn last_error(&self) -> Option<&GenerationFailure> {
        self.last_error.as_ref()
    }
}
