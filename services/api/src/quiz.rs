//! Quiz transitions shared by the HTML pages and the JSON API.

use crate::{state::AppState, store::QuizEntry};
use quizgen_core::{
    Topic,
    session::{AnswerOutcome, GenerationFailure, SessionError},
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error(transparent)]
    Rejected(#[from] SessionError),
    #[error("{}", .0.message)]
    Generation(GenerationFailure),
    #[error("session was discarded while its questions were being generated")]
    Discarded,
}

/// Validates `topic` and stores a new session in `Generating`.
pub async fn create_session(state: &AppState, topic: &str) -> Result<(Uuid, Topic), SessionError> {
    let mut entry = QuizEntry::default();
    let topic = entry.session.begin(topic)?;
    let id = state.sessions.insert(entry).await;
    info!(session_id = %id, "Session created, generating questions");
    Ok((id, topic))
}

/// Runs the generation request for session `id` and records its result.
///
/// The store lock is not held while waiting for the response. A failed
/// request leaves the session in `Idle` with the failure recorded.
#[instrument(skip(state))]
pub async fn generate(state: &AppState, id: Uuid, topic: &Topic) -> Result<(), StartError> {
    let result = state.generator.generate_questions(topic).await;

    let outcome = state
        .sessions
        .update(id, |entry| {
            entry.session.finish_generation(result)?;
            entry.sync_presenter();
            Ok::<_, SessionError>(entry.session.last_error().cloned())
        })
        .await
        .ok_or(StartError::Discarded)
        .inspect_err(|_| debug!(session_id = %id, "Session removed before generation finished"))?;

    match outcome? {
        None => Ok(()),
        Some(failure) => {
            warn!(session_id = %id, kind = ?failure.kind, "Quiz generation failed");
            Err(StartError::Generation(failure))
        }
    }
}

/// Creates a session and waits for its questions. On failure the session
/// is discarded.
pub async fn start_quiz(state: &AppState, topic: &str) -> Result<Uuid, StartError> {
    let (id, topic) = create_session(state, topic).await?;
    if let Err(err) = generate(state, id, &topic).await {
        state.sessions.remove(id).await;
        return Err(err);
    }
    Ok(id)
}

/// Answers the current question through the presenter.
///
/// Returns `Ok(None)` when the presenter is already locked for this question.
pub fn answer_current(
    entry: &mut QuizEntry,
    choice: usize,
) -> Result<Option<AnswerOutcome>, SessionError> {
    entry.sync_presenter();
    let mut scored = None;
    let session = &mut entry.session;
    entry
        .presenter
        .select(choice, |index, choice| scored = Some(session.answer(index, choice)));
    scored.transpose()
}

/// Advances the session and re-points the presenter.
pub fn advance(entry: &mut QuizEntry) -> bool {
    let moved = entry.session.advance();
    entry.sync_presenter();
    moved
}
