//! # agent-service
//!
//! AI agent service binary: loads settings, wires the canned chat producer
//! into the HTTP server and runs until ctrl-c.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use agent_core::{CannedProducer, ChatProducer};
use agent_server::{AgentServer, ServerConfig};
use agent_settings::ServiceSettings;
use anyhow::{Context, Result};
use clap::Parser;

/// AI agent service.
#[derive(Parser, Debug)]
#[command(name = "agent-service", version, about = "AI agent service")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, 0 for auto-assign (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Settings file (default `~/.agent-service/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log filter, e.g. `info` or `info,agent_server=debug` (overrides settings).
    #[arg(long)]
    log_level: Option<String>,

    /// Disable the Prometheus `/metrics` endpoint.
    #[arg(long)]
    no_metrics: bool,
}

impl Cli {
    /// Load settings and layer the command-line overrides on top.
    fn resolve_settings(&self) -> Result<ServiceSettings> {
        let mut settings = match &self.settings {
            Some(path) => agent_settings::load_settings_from_path(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => agent_settings::load_settings().with_context(|| {
                format!(
                    "Failed to load settings from {}",
                    agent_settings::settings_path().display()
                )
            })?,
        };

        if let Some(host) = &self.host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let settings = args.resolve_settings()?;

    agent_core::logging::init_subscriber(&settings.logging.level);
    tracing::info!(name = %settings.name, "starting");

    let canned = CannedProducer::new(
        settings.chat.fragments.clone(),
        settings.chat.fragment_delay(),
    );
    tracing::info!(
        fragments = canned.fragments().len(),
        delay = ?canned.delay(),
        "canned chat producer ready"
    );
    let producer: Arc<dyn ChatProducer> = Arc::new(canned);

    let config = ServerConfig::from(&settings.server);
    let mut server = AgentServer::new(config, producer, settings.name.clone());
    if !args.no_metrics {
        let handle = agent_server::metrics::install_recorder()
            .context("Failed to install metrics recorder")?;
        server = server.with_metrics(handle);
    }

    let (addr, handle) = server.listen().await.context("Failed to bind server")?;
    tracing::info!("{} listening on http://{addr}", settings.name);

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutting down...");
    let drained = server
        .shutdown()
        .drain(handle, server.config().shutdown_timeout)
        .await;
    tracing::info!(drained, "Shutdown complete");
    Ok(())
}
