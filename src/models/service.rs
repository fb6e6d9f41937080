// Per-service metrics and classified health

use serde::{Deserialize, Serialize};

/// Raw sample for one monitored service, as produced by the simulator.
/// `last_heartbeat` is a unix timestamp in seconds; classification compares
/// it against the heartbeat timeout to decide whether a service is DOWN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceMetric {
    pub service_name: String,
    pub cpu: f64,
    pub memory: f64,
    pub latency_ms: f64,
    pub error_rate: f64,
    pub last_heartbeat: f64,
}

/// Classified service state. The set is open on the wire: feeds may emit
/// statuses this build does not know, and consumers must pass them through.
/// Only `Down` carries special meaning (metrics are stale and must not be
/// rendered as live numbers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
    Down,
    #[serde(untagged)]
    Other(String),
}

impl ServiceStatus {
    pub fn is_down(&self) -> bool {
        matches!(self, ServiceStatus::Down)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ServiceStatus::Healthy => "HEALTHY",
            ServiceStatus::Degraded => "DEGRADED",
            ServiceStatus::Down => "DOWN",
            ServiceStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One monitored service's last-known state as pushed to stream clients.
/// Wholly replaced on every accepted snapshot; never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub service_name: String,
    pub status: ServiceStatus,
    pub cpu: f64,
    pub memory: f64,
    pub latency_ms: f64,
    pub error_rate: f64,
}
