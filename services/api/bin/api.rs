//! Main Entrypoint for the Quiz API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing the question generator for the configured provider.
//! 3. Constructing the Axum router and applying middleware.
//! 4. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use quizgen_api::{
    config::{Config, Provider},
    router::create_router,
    state::AppState,
    store::SessionStore,
};
use quizgen_core::{
    QuestionGenerator,
    generator::{LLMQuestionGenerator, MockQuestionGenerator},
    llm_client::{CompletionParams, OpenAICompatibleClient},
    prompt::PromptTemplate,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

fn build_generator(config: &Config) -> anyhow::Result<Arc<dyn QuestionGenerator>> {
    match &config.provider {
        Provider::OpenAI => {
            info!("Using OpenAI provider.");
            let api_key = config
                .openai_api_key
                .as_ref()
                .context("OPENAI_API_KEY is required for the openai provider")?;
            let openai_config = OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base(&config.openai_api_base);

            let prompt = match &config.prompts_path {
                Some(dir) => PromptTemplate::load_or_default(dir)
                    .with_context(|| format!("Failed to load prompt from {}", dir.display()))?,
                None => PromptTemplate::default(),
            };

            Ok(Arc::new(LLMQuestionGenerator::new(
                Arc::new(OpenAICompatibleClient::new(openai_config)),
                CompletionParams::with_model(&config.completion_model),
                prompt,
            )))
        }
        Provider::Mock => {
            info!("Using mock provider; questions are fixed.");
            Ok(Arc::new(MockQuestionGenerator))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Shared Services ---
    let generator = build_generator(&config)?;

    let sessions = SessionStore::with_ttl(config.session_ttl);
    sessions.spawn_sweeper(SWEEP_INTERVAL);

    let app_state = Arc::new(AppState {
        sessions,
        generator,
    });

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        provider = ?config.provider,
        model = %config.completion_model,
        bind_address = %config.bind_address,
        session_ttl_secs = config.session_ttl.as_secs(),
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
