//! # CGI Server - Entry Point
//! src/main.rs
//!
//! Carga la configuración, arranca el logging y lanza el bucle de accept.
//! El proceso termina con SIGINT/SIGTERM (acción por defecto).

use anyhow::Context;
use cgi_server::config::{Cli, ServerConfig};
use cgi_server::server::Server;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_thread_names(true)
        .init();

    let config = ServerConfig::load(&cli)
        .with_context(|| format!("no se pudo cargar {}", cli.config.display()))?;
    config.print_summary();

    let mut server = Server::new(config);
    server.run().context("error fatal en el servidor")?;

    info!("servidor detenido");
    Ok(())
}
