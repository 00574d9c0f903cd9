//! Axum Handlers for the JSON API
//!
//! This module contains the logic for handling HTTP requests for quiz sessions.
//! It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use quizgen_core::session::SessionError;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    models::{AnswerPayload, AnswerResponse, CreateSessionPayload, ErrorResponse, SessionSnapshot},
    quiz::{self, StartError},
    state::AppState,
};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    BadGateway(String),
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::BadGateway(message) => (StatusCode::BAD_GATEWAY, message),
            ApiError::InternalServerError(detail) => {
                error!("Internal Server Error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidTopic(_)
            | SessionError::QuestionOutOfRange { .. }
            | SessionError::ChoiceOutOfRange { .. } => ApiError::BadRequest(err.to_string()),
            SessionError::AlreadyAnswered { .. } | SessionError::Busy => {
                ApiError::Conflict(err.to_string())
            }
            SessionError::NotGenerating => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<StartError> for ApiError {
    fn from(err: StartError) -> Self {
        match err {
            StartError::Rejected(e) => e.into(),
            StartError::Generation(failure) => ApiError::BadGateway(failure.message),
            StartError::Discarded => {
                ApiError::NotFound("Session was discarded during generation".to_string())
            }
        }
    }
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Session with id '{}' not found", id))
}

/// Create a quiz session and generate its questions.
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionPayload,
    responses(
        (status = 201, description = "Quiz generated", body = SessionSnapshot),
        (status = 400, description = "Topic rejected", body = ErrorResponse),
        (status = 502, description = "Question service failed", body = ErrorResponse)
    )
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSessionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = quiz::start_quiz(&state, &payload.topic).await?;
    let entry = state.sessions.get(id).await.ok_or_else(|| not_found(id))?;
    Ok((StatusCode::CREATED, Json(SessionSnapshot::new(id, &entry))))
}

/// Get a quiz session by its ID.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    responses(
        (status = 200, description = "Session details", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let entry = state.sessions.get(id).await.ok_or_else(|| not_found(id))?;
    Ok(Json(SessionSnapshot::new(id, &entry)))
}

/// Answer one question. Each question accepts a single answer.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/answers",
    request_body = AnswerPayload,
    responses(
        (status = 200, description = "Answer scored", body = AnswerResponse),
        (status = 400, description = "Question or option out of range", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Question already answered", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn answer_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnswerPayload>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let response = state
        .sessions
        .update(id, |entry| {
            let outcome = entry.session.answer(payload.index, payload.choice)?;
            entry.sync_presenter();
            Ok::<_, SessionError>(AnswerResponse::new(outcome, entry.session.scoreboard()))
        })
        .await
        .ok_or_else(|| not_found(id))??;
    Ok(Json(response))
}

/// Move to the next question. A no-op at the final question.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/advance",
    responses(
        (status = 200, description = "Session after advancing", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn advance_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let snapshot = state
        .sessions
        .update(id, |entry| {
            quiz::advance(entry);
            SessionSnapshot::new(id, entry)
        })
        .await
        .ok_or_else(|| not_found(id))?;
    Ok(Json(snapshot))
}

/// Discard a session (restart).
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.sessions.remove(id).await {
        return Err(not_found(id));
    }
    info!(session_id = %id, "Session discarded");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizgen_core::topic::TopicError;

    #[test]
    fn test_session_errors_map_to_status_codes() {
        let cases = [
            (
                SessionError::InvalidTopic(TopicError::TooShort(3)),
                StatusCode::BAD_REQUEST,
            ),
            (
                SessionError::QuestionOutOfRange { index: 12 },
                StatusCode::BAD_REQUEST,
            ),
            (
                SessionError::AlreadyAnswered { index: 0 },
                StatusCode::CONFLICT,
            ),
            (SessionError::Busy, StatusCode::CONFLICT),
            (
                SessionError::NotGenerating,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_discarded_start_maps_to_not_found() {
        let response = ApiError::from(StartError::Discarded).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
