use anyhow::Result;
use healthwatch::*;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let (tx, _) =
        broadcast::channel::<models::SystemSnapshot>(app_config.publishing.broadcast_capacity);

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    let repo = Arc::new(metrics_repo::MetricsRepo::new(
        &app_config.simulation.services,
        now,
    ));
    tracing::info!(
        services = app_config.simulation.services.len(),
        "Fleet registered"
    );

    let ws_snapshot_connections = Arc::new(AtomicUsize::new(0));
    let (sim_shutdown_tx, sim_shutdown_rx) = tokio::sync::oneshot::channel();
    let (pub_shutdown_tx, pub_shutdown_rx) = tokio::sync::oneshot::channel();

    let simulator_handle = simulator::spawn(
        simulator::SimulatorDeps {
            repo: repo.clone(),
            shutdown_rx: sim_shutdown_rx,
        },
        simulator::SimulatorConfig {
            tick_interval_ms: app_config.simulation.tick_interval_ms,
        },
    );
    let publisher_handle = worker::spawn(
        worker::PublisherDeps {
            repo: repo.clone(),
            tx: tx.clone(),
            ws_snapshot_connections: ws_snapshot_connections.clone(),
            shutdown_rx: pub_shutdown_rx,
        },
        worker::PublisherConfig {
            snapshot_interval_ms: app_config.publishing.snapshot_interval_ms,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
            thresholds: app_config.monitoring.thresholds(),
        },
    );

    let app = routes::app(tx, repo, ws_snapshot_connections);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = sim_shutdown_tx.send(());
            let _ = pub_shutdown_tx.send(());
            let _ = simulator_handle.await;
            let _ = publisher_handle.await;
        }
    }

    Ok(())
}
