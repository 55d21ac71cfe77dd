//! Subcommand implementations

use anyhow::{Context, Result, bail};
use ask_api::{AppState, MetricsHandle, create_router};
use ask_core::{ImportService, QueryService, TzfResolver};
use ask_db::Database;
use ask_mirror::{GitMirror, MirrorSource};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;

/// Sync the mirror, rebuild the store and import every table
pub async fn init(config: &Config) -> Result<()> {
    let db_dir = config.db_dir();
    tokio::fs::create_dir_all(&db_dir)
        .await
        .with_context(|| format!("Failed to create {}", db_dir.display()))?;

    let mirror = Arc::new(
        GitMirror::new(&config.repository, &config.data, &config.upstream.url)
            .with_git_binary(&config.upstream.git_binary),
    );
    let snapshot = mirror
        .ensure_current()
        .await
        .context("Failed to sync upstream data")?;

    let store = config.store_path();
    let db = Database::recreate(&store)
        .await
        .with_context(|| format!("Failed to create database at {}", store.display()))?;

    let result = ImportService::new(db.clone(), mirror)
        .import_snapshot(&snapshot)
        .await;
    db.close().await;
    let report = result.context("Import failed")?;

    println!(
        "Imported upstream commit {} ({})",
        report.commit.hash,
        report.commit.authored_at.to_rfc3339()
    );
    for table in &report.tables {
        println!("  {:<10} {:>8} records", table.table, table.record_count);
    }
    println!("Database: {}", store.display());
    Ok(())
}

/// Serve the HTTP API until SIGINT/SIGTERM
pub async fn serve(config: &Config, metrics: Option<Arc<MetricsHandle>>) -> Result<()> {
    let db = open_store(config).await?;

    // Decoding the timezone polygons takes a while; keep it off the runtime threads
    let resolver = tokio::task::spawn_blocking(TzfResolver::new)
        .await
        .context("Failed to build timezone resolver")?;
    let query = Arc::new(QueryService::new(db.clone(), Arc::new(resolver)));

    let app = create_router(AppState::new(query), metrics)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                config.server.bind_address, config.server.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result.context("Server task failed")?.context("Server error")?;
            db.close().await;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    let window = Duration::from_secs(config.server.shutdown_timeout_secs);
    info!("Shutting down, waiting up to {:?} for in-flight requests", window);
    let _ = stop_tx.send(());

    match tokio::time::timeout(window, &mut server).await {
        Ok(result) => {
            result.context("Server task failed")?.context("Server error")?;
        }
        Err(_) => {
            warn!("Shutdown window elapsed, abandoning in-flight requests");
            server.abort();
        }
    }

    db.close().await;
    info!("Server stopped");
    Ok(())
}

/// Print the provenance of each imported table
pub async fn status(config: &Config) -> Result<()> {
    let store = config.store_path();
    if !tokio::fs::try_exists(&store)
        .await
        .with_context(|| format!("Failed to check for {}", store.display()))?
    {
        println!("Not initialized: no database at {}", store.display());
        return Ok(());
    }

    let db = open_store(config).await?;
    let rows = db.list_import_status().await;
    db.close().await;
    let rows = rows.context("Failed to read import status")?;

    if rows.is_empty() {
        println!("No tables imported yet");
        return Ok(());
    }

    println!(
        "{:<10} {:>8}  {:<40}  {:<25}  {}",
        "TABLE", "RECORDS", "COMMIT", "COMMIT DATE", "IMPORTED"
    );
    for row in rows {
        println!(
            "{:<10} {:>8}  {:<40}  {:<25}  {}",
            row.table_name,
            row.record_count,
            row.git_commit_hash,
            row.git_commit_date.to_rfc3339(),
            row.last_import_date.to_rfc3339()
        );
    }
    Ok(())
}

/// Open the store read-only, refusing to start without one
async fn open_store(config: &Config) -> Result<Database> {
    let store = config.store_path();
    if !tokio::fs::try_exists(&store)
        .await
        .with_context(|| format!("Failed to check for {}", store.display()))?
    {
        bail!(
            "Database not found at {}; run `ask init` first",
            store.display()
        );
    }
    Database::open(&store)
        .await
        .with_context(|| format!("Failed to open database at {}", store.display()))
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for CTRL+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}
