//! Binary entrypoint: boots the Axum HTTP server, wiring routes, shared
//! state, and middleware.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use growth_signals::api::{create_router, AppState};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("growth_signals=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    // AI client is built once here and injected; no module-level globals.
    let state = AppState::from_env();
    tracing::info!(provider = state.ai.provider_name(), "Growth Signals API starting up");

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
