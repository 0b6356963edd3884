use cobranza_core::observability::init_tracing;
use notas_service::config::NotasConfig;
use notas_service::startup::Application;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    init_tracing("notas-service", "info");

    let config = NotasConfig::load().map_err(std::io::Error::other)?;
    let application = Application::build(config)
        .await
        .map_err(std::io::Error::other)?;

    tokio::select! {
        result = application.run_until_stopped() => result,
        _ = shutdown_signal() => {
            info!("Shutdown signal received, stopping");
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
