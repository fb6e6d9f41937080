// Snapshot publisher: classifies the fleet, evaluates alerts, broadcasts

use crate::alerts::{AlertThresholds, classify_service, evaluate_alerts};
use crate::metrics_repo::MetricsRepo;
use crate::models::{ServiceHealth, SystemSnapshot};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, interval};

/// Rate limit for "no receivers" logging (avoid a line every tick when no
/// one is on /ws/snapshot)
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(60);

pub struct PublisherDeps {
    pub repo: Arc<MetricsRepo>,
    pub tx: broadcast::Sender<SystemSnapshot>,
    pub ws_snapshot_connections: Arc<AtomicUsize>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Publisher timing, logging and thresholds.
/// Stats logging uses real-time intervals, independent of the publish tick.
pub struct PublisherConfig {
    pub snapshot_interval_ms: u64,
    pub stats_log_interval_secs: u64,
    pub thresholds: AlertThresholds,
}

/// Assemble one snapshot from the current registry contents: classify each
/// service's latest sample, then evaluate the active alert list.
pub fn build_snapshot(
    repo: &MetricsRepo,
    now: f64,
    thresholds: &AlertThresholds,
) -> anyhow::Result<SystemSnapshot> {
    let metrics = repo.all_metrics()?;
    let services = metrics
        .iter()
        .map(|m| ServiceHealth {
            service_name: m.service_name.clone(),
            status: classify_service(m, now, thresholds),
            cpu: m.cpu,
            memory: m.memory,
            latency_ms: m.latency_ms,
            error_rate: m.error_rate,
        })
        .collect();
    let alerts = evaluate_alerts(&metrics, now, thresholds);
    Ok(SystemSnapshot { services, alerts })
}

pub fn spawn(deps: PublisherDeps, config: PublisherConfig) -> tokio::task::JoinHandle<()> {
    let PublisherDeps {
        repo,
        tx,
        ws_snapshot_connections,
        mut shutdown_rx,
    } = deps;
    let PublisherConfig {
        snapshot_interval_ms,
        stats_log_interval_secs,
        thresholds,
    } = config;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(snapshot_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut snapshots_published_total: u64 = 0;
        let mut last_no_receivers_warn: Option<Instant> = None;

        let publisher_span =
            tracing::span!(tracing::Level::DEBUG, "publisher", snapshot_interval_ms);
        let _guard = publisher_span.enter();

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .map(|d| d.as_secs_f64())
                        .unwrap_or_else(|e| {
                            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
                            0.0
                        });

                    let snapshot = match build_snapshot(&repo, now, &thresholds) {
                        Ok(s) => s,
                        Err(e) => {
                            tracing::warn!(error = %e, operation = "build_snapshot", "snapshot assembly failed");
                            continue;
                        }
                    };

                    if tx.send(snapshot).is_err() {
                        let should_warn = last_no_receivers_warn
                            .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL);
                        if should_warn {
                            tracing::debug!(
                                operation = "broadcast_snapshot",
                                "No active WebSocket clients; broadcast channel has no receivers"
                            );
                            last_no_receivers_warn = Some(Instant::now());
                        }
                    } else {
                        snapshots_published_total += 1;
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Publisher shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        ws_snapshot_clients =
                            ws_snapshot_connections.load(std::sync::atomic::Ordering::Relaxed),
                        snapshots_published_total,
                        "app stats"
                    );
                }
            }
        }
    })
}
