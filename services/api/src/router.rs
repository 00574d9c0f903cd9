//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the HTML pages, the JSON API, and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        AnswerPayload, AnswerResponse, CreateSessionPayload, ErrorResponse, Phase,
        QuestionSnapshot, Score, SessionSnapshot,
    },
    pages,
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_session,
        handlers::get_session,
        handlers::answer_question,
        handlers::advance_session,
        handlers::delete_session,
    ),
    components(
        schemas(SessionSnapshot, QuestionSnapshot, Score, Phase, CreateSessionPayload, AnswerPayload, AnswerResponse, ErrorResponse)
    ),
    tags(
        (name = "Quiz API", description = "Topic-to-quiz sessions backed by a text-completion model")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let pages_router = Router::new()
        .route("/", get(pages::index))
        .route("/quiz", post(pages::submit_topic))
        .route("/quiz/{id}", get(pages::show_quiz))
        .route("/quiz/{id}/answer", post(pages::answer))
        .route("/quiz/{id}/next", post(pages::next))
        .route("/quiz/{id}/restart", post(pages::restart));

    let api_router = Router::new()
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/api/sessions/{id}/answers", post(handlers::answer_question))
        .route("/api/sessions/{id}/advance", post(handlers::advance_session));

    // Apply the state only to the routes that need it.
    let stateful = pages_router.merge(api_router).with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health))
        .merge(stateful)
        .layer(TraceLayer::new_for_http())
}
