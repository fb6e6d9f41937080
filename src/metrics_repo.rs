// In-memory metrics and fault state for the monitored fleet

use crate::models::{FaultMode, ServiceMetric};
use std::collections::HashMap;
use std::sync::Mutex;

/// Latest metric sample and requested fault mode per service.
/// The service set is fixed at startup; `all_metrics` returns samples in
/// registration order so snapshot output is stable across ticks.
pub struct MetricsRepo {
    names: Vec<String>,
    metrics: Mutex<HashMap<String, ServiceMetric>>,
    faults: Mutex<HashMap<String, FaultMode>>,
}

impl MetricsRepo {
    /// Registers `names` with zeroed metrics stamped at `now`, so every
    /// service is visible (and healthy) before the first simulator tick.
    pub fn new(names: &[String], now: f64) -> Self {
        let metrics = names
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    ServiceMetric {
                        service_name: name.clone(),
                        cpu: 0.0,
                        memory: 0.0,
                        latency_ms: 0.0,
                        error_rate: 0.0,
                        last_heartbeat: now,
                    },
                )
            })
            .collect();
        Self {
            names: names.to_vec(),
            metrics: Mutex::new(metrics),
            faults: Mutex::new(HashMap::new()),
        }
    }

    pub fn service_names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, service_name: &str) -> bool {
        self.names.iter().any(|n| n == service_name)
    }

    pub fn update(&self, metric: ServiceMetric) -> anyhow::Result<()> {
        let mut metrics = self
            .metrics
            .lock()
            .map_err(|e| anyhow::anyhow!("metrics lock poisoned: {}", e))?;
        metrics.insert(metric.service_name.clone(), metric);
        Ok(())
    }

    /// Current samples for all services, in registration order.
    pub fn all_metrics(&self) -> anyhow::Result<Vec<ServiceMetric>> {
        let metrics = self
            .metrics
            .lock()
            .map_err(|e| anyhow::anyhow!("metrics lock poisoned: {}", e))?;
        Ok(self
            .names
            .iter()
            .filter_map(|name| metrics.get(name).cloned())
            .collect())
    }

    /// Requested fault mode for a service; NONE when never set.
    pub fn fault(&self, service_name: &str) -> anyhow::Result<FaultMode> {
        let faults = self
            .faults
            .lock()
            .map_err(|e| anyhow::anyhow!("faults lock poisoned: {}", e))?;
        Ok(faults.get(service_name).copied().unwrap_or_default())
    }

    /// Returns false when the service is unknown; the mode is not recorded.
    pub fn set_fault(&self, service_name: &str, mode: FaultMode) -> anyhow::Result<bool> {
        if !self.contains(service_name) {
            return Ok(false);
        }
        let mut faults = self
            .faults
            .lock()
            .map_err(|e| anyhow::anyhow!("faults lock poisoned: {}", e))?;
        faults.insert(service_name.to_string(), mode);
        Ok(true)
    }

    pub fn clear_fault(&self, service_name: &str) -> anyhow::Result<bool> {
        self.set_fault(service_name, FaultMode::None)
    }
}
