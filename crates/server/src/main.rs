mod api;
mod app_config;
mod cli;
mod router;
mod startup;
mod state;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = cli::Cli::parse();
    let config = app_config::load_config(&cli);
    config.log_summary();

    let state = startup::build_default_app_state(config)?;
    let processor = startup::spawn_background_tasks(&state);

    let addr = state.config.server.bind_addr();
    let app = router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Stopping batch processor");
    state.processor.shutdown();
    processor.await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
    info!("Shutdown signal received");
}
