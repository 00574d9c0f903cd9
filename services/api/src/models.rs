//! API Models
//!
//! JSON request and response bodies for the `/api` routes. These are
//! projections of the core session types, annotated for OpenAPI generation
//! with `utoipa`.

use chrono::{DateTime, Utc};
use quizgen_core::session::{AnswerOutcome, QuizSession, Scoreboard, SessionPhase};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::QuizEntry;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Generating,
    Presenting,
    Complete,
}

impl From<SessionPhase> for Phase {
    fn from(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::Idle => Phase::Idle,
            SessionPhase::Generating => Phase::Generating,
            SessionPhase::Presenting => Phase::Presenting,
            SessionPhase::Complete => Phase::Complete,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub total: usize,
    pub correct: u32,
    pub incorrect: u32,
}

impl From<Scoreboard> for Score {
    fn from(board: Scoreboard) -> Self {
        Self {
            total: board.total,
            correct: board.correct,
            incorrect: board.incorrect,
        }
    }
}

/// A question as exposed to clients.
///
/// `correct_answer` stays hidden until the question has been answered.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct QuestionSnapshot {
    #[schema(example = "What is the capital of France?")]
    pub question: String,
    pub options: Vec<String>,
    pub answered_choice: Option<usize>,
    pub correct_answer: Option<usize>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SessionSnapshot {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    pub topic: Option<String>,
    #[schema(value_type = String, example = "presenting")]
    pub phase: Phase,
    pub current_index: usize,
    pub score: Score,
    pub questions: Vec<QuestionSnapshot>,
    pub created_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn new(id: Uuid, entry: &QuizEntry) -> Self {
        let session: &QuizSession = &entry.session;
        let questions = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, q)| {
                let answered_choice = session.answer_for(index);
                QuestionSnapshot {
                    question: q.question().to_string(),
                    options: q.options().to_vec(),
                    answered_choice,
                    correct_answer: answered_choice.map(|_| q.correct_answer()),
                }
            })
            .collect();

        Self {
            id,
            topic: session.topic().map(|t| t.to_string()),
            phase: session.phase().into(),
            current_index: session.current_index(),
            score: session.scoreboard().into(),
            questions,
            created_at: entry.created_at,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateSessionPayload {
    #[schema(example = "The French Revolution")]
    pub topic: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AnswerPayload {
    pub index: usize,
    pub choice: usize,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct AnswerResponse {
    pub index: usize,
    pub choice: usize,
    pub correct: bool,
    pub correct_answer: usize,
    pub score: Score,
}

impl AnswerResponse {
    pub fn new(outcome: AnswerOutcome, board: Scoreboard) -> Self {
        Self {
            index: outcome.index,
            choice: outcome.choice,
            correct: outcome.correct,
            correct_answer: outcome.correct_answer,
            score: board.into(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
