// src/main_rest.rs

use lambda_forge::{
    config,
    server::{router, AppState},
    ChatClient,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> lambda_forge::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings_path = std::env::var_os("LAMBDA_FORGE_SETTINGS").map(std::path::PathBuf::from);
    let settings = config::load_config(settings_path.as_deref())?;

    // Credential problems do not stop the server; model routes report them.
    let state = match config::resolve_api_key(&settings.llm) {
        Ok(api_key) => {
            let client = ChatClient::new(&settings.llm, api_key)?;
            tracing::info!(model = client.model(), "Language model configured");
            AppState::new(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("{}; model-backed routes are disabled", e);
            AppState::without_model(e.to_string())
        }
    };

    let listener = TcpListener::bind(settings.server.bind.as_str()).await?;
    tracing::info!("✅ REST server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
