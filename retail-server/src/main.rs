use retail_runner::{Chatbot, Orchestrator};
use retail_server::{ChatbotConfig, ServerConfig, create_app};
use retail_session::{InMemorySessionStore, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let chatbot_config = ChatbotConfig::from_env();
    let server_config = ServerConfig::from_env();

    let store = build_store(&chatbot_config).await;
    spawn_session_sweeper(store.clone());

    let orchestrator = Arc::new(Orchestrator::with_agents(retail_agent::default_agents()));
    let chatbot = Arc::new(Chatbot::new(orchestrator, store, chatbot_config.max_history));

    let app = create_app(chatbot, &server_config);
    let addr = server_config.addr()?;

    tracing::info!(%addr, "starting retail chatbot API");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &ChatbotConfig) -> Arc<dyn SessionStore> {
    #[cfg(feature = "redis")]
    if let Ok(url) = std::env::var("REDIS_URL") {
        match retail_session::RedisSessionStore::connect(&url, config.ttl_hours).await {
            Ok(store) => return Arc::new(store),
            Err(err) => {
                tracing::warn!(error = %err, "redis connection failed, using in-memory sessions");
            }
        }
    }
    Arc::new(InMemorySessionStore::new(config.ttl_hours))
}

/// Periodic expiry sweep. A no-op against TTL-native backends.
fn spawn_session_sweeper(store: Arc<dyn SessionStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        interval.tick().await;
        loop {
            interval.tick().await;
            match store.cleanup_expired().await {
                Ok(removed) if removed > 0 => {
                    tracing::info!(removed, "expired sessions swept");
                }
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "session sweep failed"),
            }
        }
    });
}
