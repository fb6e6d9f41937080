// Health classification and alert evaluation

use crate::models::{Alert, AlertSeverity, ServiceMetric, ServiceStatus};

pub const ALERT_SERVICE_DOWN: &str = "SERVICE_DOWN";
pub const ALERT_HIGH_CPU: &str = "HIGH_CPU";
pub const ALERT_HIGH_ERROR_RATE: &str = "HIGH_ERROR_RATE";

/// Classification and alerting thresholds. Defaults match the shipped
/// config: CPU above 85%, error rate above 10%, heartbeat stale after 5s.
#[derive(Debug, Clone, Copy)]
pub struct AlertThresholds {
    pub high_cpu_percent: f64,
    pub high_error_rate: f64,
    pub heartbeat_timeout_secs: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            high_cpu_percent: 85.0,
            high_error_rate: 0.10,
            heartbeat_timeout_secs: 5.0,
        }
    }
}

/// Decide whether a service is HEALTHY, DEGRADED or DOWN.
/// DOWN (stale heartbeat) takes priority over DEGRADED.
pub fn classify_service(
    metric: &ServiceMetric,
    now: f64,
    thresholds: &AlertThresholds,
) -> ServiceStatus {
    let heartbeat_age = now - metric.last_heartbeat;
    if heartbeat_age > thresholds.heartbeat_timeout_secs {
        return ServiceStatus::Down;
    }
    if metric.cpu > thresholds.high_cpu_percent || metric.error_rate > thresholds.high_error_rate {
        return ServiceStatus::Degraded;
    }
    ServiceStatus::Healthy
}

/// Produce the active alert list for the current metrics of all services.
/// A service can carry several alerts at once (e.g. high CPU and high
/// error rate, or a stale heartbeat on top of a bad last sample).
pub fn evaluate_alerts(
    metrics: &[ServiceMetric],
    now: f64,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for metric in metrics {
        let heartbeat_age = now - metric.last_heartbeat;

        if heartbeat_age > thresholds.heartbeat_timeout_secs {
            alerts.push(Alert {
                service_name: metric.service_name.clone(),
                type_: ALERT_SERVICE_DOWN.into(),
                severity: AlertSeverity::Critical,
                message: format!(
                    "{} has not sent a heartbeat for {:.1} seconds.",
                    metric.service_name, heartbeat_age
                ),
            });
        }

        if metric.cpu > thresholds.high_cpu_percent {
            alerts.push(Alert {
                service_name: metric.service_name.clone(),
                type_: ALERT_HIGH_CPU.into(),
                severity: AlertSeverity::Warning,
                message: format!("{} CPU at {:.1}%.", metric.service_name, metric.cpu),
            });
        }

        if metric.error_rate > thresholds.high_error_rate {
            alerts.push(Alert {
                service_name: metric.service_name.clone(),
                type_: ALERT_HIGH_ERROR_RATE.into(),
                severity: AlertSeverity::Warning,
                message: format!(
                    "{} error rate at {:.2}.",
                    metric.service_name, metric.error_rate
                ),
            });
        }
    }

    alerts
}
