//! clinic-concierge server binary.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use clinic_concierge::adapters::http::{chat_routes, ChatHandlers};
use clinic_concierge::adapters::{
    InMemorySessionStore, LoggingBookingSink, LoggingConversationStore, LoggingNotificationSink,
    OpenAiCompatConfig, OpenAiCompatGenerator,
};
use clinic_concierge::application::ConversationManager;
use clinic_concierge::config::{AppConfig, ValidationError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate()?;
    info!(
        environment = ?config.server.environment,
        provider = ?config.ai.provider,
        model = %config.ai.model,
        "starting clinic-concierge"
    );

    let api_key = config
        .ai
        .api_key()
        .ok_or(ValidationError::MissingRequired("AI__API_KEY"))?;
    let generator = OpenAiCompatGenerator::new(
        OpenAiCompatConfig::new(api_key)
            .with_base_url(config.ai.provider.base_url())
            .with_model(config.ai.model.clone())
            .with_temperature(config.ai.temperature)
            .with_max_tokens(config.ai.max_tokens)
            .with_timeout(config.ai.timeout()),
    )?;

    let manager = Arc::new(
        ConversationManager::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(generator),
            Arc::new(LoggingBookingSink::new()),
            Arc::new(LoggingNotificationSink::new()),
            Arc::new(LoggingConversationStore::new()),
        )
        .with_history_window(config.sessions.history_window),
    );

    spawn_idle_sweeper(&config, manager.clone());

    let app = chat_routes(ChatHandlers::new(manager))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically expires conversations idle past the configured timeout.
fn spawn_idle_sweeper(config: &AppConfig, manager: Arc<ConversationManager>) {
    let idle_timeout = config.sessions.idle_timeout();
    let sweep_interval = config.sessions.sweep_interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        // interval fires immediately on the first tick
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(error) = manager.sweep_idle(idle_timeout).await {
                warn!(%error, "idle session sweep failed");
            }
        }
    });
}
