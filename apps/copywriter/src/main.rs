use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use copywriter::config::Config;
use copywriter::generation::generator::{resolve_model, CopyGenerator};
use copywriter::llm_client::LlmClient;
use copywriter::logging;
use copywriter::routes::build_router;
use copywriter::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    logging::init(&config.rust_log);

    info!("Starting Copywriter API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.openai_api_key.clone(), &config.openai_base_url);
    info!(
        "LLM client initialized (default model: {})",
        resolve_model(None, config.openai_model.as_deref())
    );

    let state = AppState {
        generator: CopyGenerator::new(Arc::new(llm), config.openai_model.clone()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
