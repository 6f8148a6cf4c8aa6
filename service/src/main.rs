use anyhow::Context;
use tokio::net::TcpListener;
use todo_service::telemetry::{self, LogFormat};
use todo_service::{run, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the variables may come from the real environment.
    dotenvy::dotenv().ok();
    telemetry::init(LogFormat::from_env());

    let config = Config::from_env().context("loading configuration")?;
    let state = AppState::from_config(&config);

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(
        %addr,
        service_sid = %config.sync.service_sid,
        base_url = %config.sync.base_url,
        "todo API listening"
    );

    run(listener, state, shutdown_signal())
        .await
        .context("serving HTTP")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
