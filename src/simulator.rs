// Simulated fleet: randomized metrics per tick, honoring requested faults

use crate::metrics_repo::MetricsRepo;
use crate::models::{FaultMode, ServiceMetric};
use rand::Rng;
use std::sync::Arc;
use tokio::time::{Duration, interval};

pub struct SimulatorDeps {
    pub repo: Arc<MetricsRepo>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct SimulatorConfig {
    pub tick_interval_ms: u64,
}

/// One simulation pass over every registered service at time `now`.
///
/// Baseline ranges: cpu and memory 5-95%, latency 20-500ms, error rate
/// 0-0.2. A HIGH_CPU fault pushes cpu above the alert threshold, a
/// HIGH_ERROR_RATE fault pushes the error rate above its threshold, and a
/// DOWN fault suppresses the sample entirely so the heartbeat goes stale.
pub fn step(repo: &MetricsRepo, now: f64) {
    let mut rng = rand::thread_rng();
    for name in repo.service_names() {
        let fault = match repo.fault(name) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(error = %e, service_name = %name, "fault lookup failed");
                continue;
            }
        };
        if fault == FaultMode::Down {
            continue;
        }

        let mut cpu = rng.gen_range(5.0..95.0);
        let mut error_rate = rng.gen_range(0.0..0.2);
        match fault {
            FaultMode::HighCpu => cpu = rng.gen_range(90.0..100.0),
            FaultMode::HighErrorRate => error_rate = rng.gen_range(0.2..0.6),
            _ => {}
        }

        let metric = ServiceMetric {
            service_name: name.clone(),
            cpu,
            memory: rng.gen_range(5.0..95.0),
            latency_ms: rng.gen_range(20.0..500.0),
            error_rate,
            last_heartbeat: now,
        };
        if let Err(e) = repo.update(metric) {
            tracing::warn!(error = %e, service_name = %name, "metric update failed");
        }
    }
}

pub fn spawn(deps: SimulatorDeps, config: SimulatorConfig) -> tokio::task::JoinHandle<()> {
    let SimulatorDeps {
        repo,
        mut shutdown_rx,
    } = deps;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(config.tick_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

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
                    step(&repo, now);
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Simulator shutting down");
                    break;
                }
            }
        }
    })
}
