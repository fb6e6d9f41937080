use serde::Deserialize;

use crate::alerts::AlertThresholds;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub simulation: SimulationConfig,
    pub publishing: PublishingConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Names of the simulated services. Fixed for the process lifetime.
    pub services: Vec<String>,
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    pub snapshot_interval_ms: u64,
    /// Max number of snapshots kept in the broadcast channel for
    /// /ws/snapshot (slow clients may lag).
    pub broadcast_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_high_cpu_percent")]
    pub high_cpu_percent: f64,
    #[serde(default = "default_high_error_rate")]
    pub high_error_rate: f64,
    #[serde(default = "default_heartbeat_timeout_secs")]
    pub heartbeat_timeout_secs: f64,
    /// How often to log app stats (ws_snapshot clients, snapshots
    /// published) at INFO level.
    pub stats_log_interval_secs: u64,
}

fn default_high_cpu_percent() -> f64 {
    85.0
}

fn default_high_error_rate() -> f64 {
    0.10
}

fn default_heartbeat_timeout_secs() -> f64 {
    5.0
}

impl MonitoringConfig {
    pub fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            high_cpu_percent: self.high_cpu_percent,
            high_error_rate: self.high_error_rate,
            heartbeat_timeout_secs: self.heartbeat_timeout_secs,
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.simulation.services.is_empty(),
            "simulation.services must name at least one service"
        );
        anyhow::ensure!(
            self.simulation.services.iter().all(|s| !s.is_empty()),
            "simulation.services must not contain empty names"
        );
        let mut seen = std::collections::HashSet::new();
        for name in &self.simulation.services {
            anyhow::ensure!(
                seen.insert(name.as_str()),
                "simulation.services contains duplicate name {:?}",
                name
            );
        }
        anyhow::ensure!(
            self.simulation.tick_interval_ms > 0,
            "simulation.tick_interval_ms must be > 0, got {}",
            self.simulation.tick_interval_ms
        );
        anyhow::ensure!(
            self.publishing.snapshot_interval_ms > 0,
            "publishing.snapshot_interval_ms must be > 0, got {}",
            self.publishing.snapshot_interval_ms
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        anyhow::ensure!(
            self.monitoring.high_cpu_percent > 0.0,
            "monitoring.high_cpu_percent must be > 0, got {}",
            self.monitoring.high_cpu_percent
        );
        anyhow::ensure!(
            self.monitoring.high_error_rate > 0.0 && self.monitoring.high_error_rate <= 1.0,
            "monitoring.high_error_rate must be in (0, 1], got {}",
            self.monitoring.high_error_rate
        );
        anyhow::ensure!(
            self.monitoring.heartbeat_timeout_secs > 0.0,
            "monitoring.heartbeat_timeout_secs must be > 0, got {}",
            self.monitoring.heartbeat_timeout_secs
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}
