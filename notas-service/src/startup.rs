use crate::config::NotasConfig;
use crate::handlers;
use crate::services::{LocalStorage, NotaService, NotaStore};
use axum::routing::{get, post};
use axum::serve::Serve;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub notas: Arc<NotaService>,
}

pub struct Application {
    port: u16,
    server: Serve<Router, Router>,
}

impl Application {
    pub async fn build(config: NotasConfig) -> Result<Self, anyhow::Error> {
        let store = NotaStore::new(config.notas_file()).await?;
        let storage = Arc::new(LocalStorage::new(&config.storage.docs_dir).await?);
        let state = AppState {
            notas: Arc::new(NotaService::new(store, storage)),
        };

        let app = Router::new()
            .route("/health", get(handlers::health::health_check))
            .route(
                "/api/notas",
                get(handlers::notas::list_notas).post(handlers::notas::upload_nota),
            )
            .route(
                "/api/notas/:id/entregar",
                post(handlers::notas::deliver_nota),
            )
            .route("/api/notas/:id/pagos", post(handlers::notas::register_pago))
            .route(
                "/api/notas/:id/documento",
                get(handlers::notas::download_documento),
            )
            .route("/api/kpis", get(handlers::notas::get_kpis))
            .route("/api/faltantes", get(handlers::notas::get_faltantes))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let address = format!("0.0.0.0:{}", config.common.port);
        let listener = TcpListener::bind(&address).await?;
        let port = listener.local_addr()?.port();
        info!(port, "Listening");

        let server = axum::serve(listener, app);
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
