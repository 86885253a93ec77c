//! ghexporter binary.
//!
//! - Config: optional YAML file (`GHEXPORTER_CONFIG`) + classic env vars
//! - Logging: `RUST_LOG`, falling back to `LOG_LEVEL`, then `info`
//! - `/` landing page, `/healthz`, `/readyz`, and the metrics path
//! - Graceful shutdown on Ctrl-C / SIGTERM (readiness flips to draining first)

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use ghexporter_server::{app_state::AppState, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    let directive = config::log_directive(|key| std::env::var(key).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "ghexporter failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load(|key| std::env::var(key).ok())?;
    let settings = config::Settings::from_config(&cfg)?;
    let listen = settings.listen;

    tracing::info!(
        %listen,
        metrics_path = %settings.metrics_path,
        api_url = %settings.api_url,
        token = settings.token.is_some(),
        owners = settings.targets.len(),
        "starting exporter"
    );

    let state = AppState::new(settings)?;
    let app = router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    tracing::info!("ghexporter stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl-c handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state.set_draining();
    tracing::info!("shutdown requested, draining");
}
