//! Axum Handlers for the HTML pages
//!
//! Every interaction is a plain form post followed by a `303 See Other`
//! redirect back to the quiz page, so reloading never repeats an action.
//! Questions are generated in a background task; until they arrive the quiz
//! page refreshes itself.

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use maud::Markup;
use quizgen_core::session::SessionPhase;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{quiz, state::AppState, views};

#[derive(Deserialize)]
pub struct TopicForm {
    pub topic: String,
}

#[derive(Deserialize)]
pub struct ChoiceForm {
    pub choice: usize,
}

fn quiz_url(id: Uuid) -> String {
    format!("/quiz/{}", id)
}

fn missing() -> Response {
    (StatusCode::NOT_FOUND, views::not_found()).into_response()
}

pub async fn index() -> Markup {
    views::topic_form(None, "")
}

pub async fn submit_topic(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TopicForm>,
) -> Response {
    match quiz::create_session(&state, &form.topic).await {
        Ok((id, topic)) => {
            let task_state = state.clone();
            tokio::spawn(async move {
                // The outcome is recorded on the session and rendered by `show_quiz`.
                let _ = quiz::generate(&task_state, id, &topic).await;
            });
            Redirect::to(&quiz_url(id)).into_response()
        }
        Err(err) => (
            StatusCode::BAD_REQUEST,
            views::topic_form(Some(&err.to_string()), &form.topic),
        )
            .into_response(),
    }
}

pub async fn show_quiz(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    let Some(mut entry) = state.sessions.get(id).await else {
        return missing();
    };
    match entry.session.phase() {
        SessionPhase::Idle => {
            // Generation failed: report it once, then start over from the form.
            state.sessions.remove(id).await;
            let topic = entry.session.topic().map(|t| t.as_str()).unwrap_or_default();
            match entry.session.last_error() {
                Some(failure) => (
                    StatusCode::BAD_GATEWAY,
                    views::topic_form(Some(&failure.message), topic),
                )
                    .into_response(),
                None => Redirect::to("/").into_response(),
            }
        }
        SessionPhase::Generating => views::generating(id).into_response(),
        SessionPhase::Presenting | SessionPhase::Complete => {
            entry.sync_presenter();
            views::quiz_page(id, &entry).into_response()
        }
    }
}

pub async fn answer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<ChoiceForm>,
) -> Response {
    let result = state
        .sessions
        .update(id, |entry| quiz::answer_current(entry, form.choice))
        .await;
    match result {
        None => missing(),
        Some(Ok(outcome)) => {
            debug!(session_id = %id, ?outcome, "Answer submitted");
            Redirect::to(&quiz_url(id)).into_response()
        }
        Some(Err(err)) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

pub async fn next(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    match state.sessions.update(id, quiz::advance).await {
        None => missing(),
        Some(_) => Redirect::to(&quiz_url(id)).into_response(),
    }
}

pub async fn restart(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Redirect {
    if state.sessions.remove(id).await {
        info!(session_id = %id, "Session restarted");
    }
    Redirect::to("/")
}
