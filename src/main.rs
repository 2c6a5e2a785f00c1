//src/main.rs

use axum::{extract::Request, ServiceExt};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod cli;
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;

use crate::cli::{Cli, Commands};
use crate::config::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let app_state = AppState::new(config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(app_state).await,
        command => {
            if let Err(e) = cli::run(command, &app_state).await {
                tracing::error!("Comando falhou: {e}");
                return Err(e);
            }
            Ok(())
        }
    }
}

async fn serve(app_state: AppState) -> anyhow::Result<()> {
    let addr = app_state.config.server_addr;
    let app = routes::build_app(app_state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Documentação em http://{}/swagger-ui", listener.local_addr()?);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}
