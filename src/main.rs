// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use cortex_doc_chat::{
    api::{start_server, AppState, PageRenderer},
    catalog::SnowflakeCatalog,
    chat::{ChatOrchestrator, SessionConfig, SessionStore, SessionStoreConfig},
    cli::Cli,
    completion::CortexCompleter,
    search::SearchAdapter,
    snowflake::SnowflakeClient,
    version,
};
use std::{env, net::SocketAddr, sync::Arc, time::Duration};
use tracing::{error, info};

/// How often idle sessions are swept
const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting {}", version::get_version_string());

    let cli = Cli::parse();
    let config = cli
        .into_app_config()
        .context("Snowflake credentials are incomplete; set SNOWFLAKE_* variables or pass --secrets")?;
    config.validate().context("Invalid configuration")?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.listen_addr))?;

    // The one fatal remote failure: nothing works without a connection
    let client = match SnowflakeClient::connect(&config).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("{}", e);
            anyhow::bail!(
                "Could not connect to Snowflake account {}. Check the account identifier, \
                 user and access token, and that warehouse {} is available.",
                config.connection.account,
                config.connection.warehouse
            );
        }
    };

    let search_service = client.search_service(&config.search);
    info!(
        "Using search service {} ({:?} mode)",
        search_service.qualified_name(),
        config.chat.answer_mode
    );

    let orchestrator = Arc::new(ChatOrchestrator::new(
        SearchAdapter::new(Arc::new(search_service)),
        Arc::new(SnowflakeCatalog::new(client.clone(), config.catalog.clone())),
        Arc::new(CortexCompleter::new(client.clone())),
        config.chat.clone(),
        config.catalog.presign_ttl_secs,
    ));

    let sessions = Arc::new(SessionStore::new(SessionStoreConfig {
        max_sessions: config.max_sessions,
        idle_timeout: config.session_idle_timeout,
        defaults: SessionConfig::new(config.default_model()),
    }));
    SessionStore::spawn_eviction(sessions.clone(), EVICTION_INTERVAL);

    let renderer = PageRenderer::new().context("Failed to load page template")?;
    let state = AppState::new(orchestrator, sessions, renderer);

    tokio::select! {
        result = start_server(state, addr) => {
            result.with_context(|| format!("Server on {} stopped", addr))?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}
