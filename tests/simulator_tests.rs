// Simulator tests: baseline ranges and fault application

mod common;

use healthwatch::models::FaultMode;
use healthwatch::simulator;

#[test]
fn test_step_samples_every_service_within_baseline_ranges() {
    let repo = common::test_repo(0.0);
    simulator::step(&repo, 500.0);
    let metrics = repo.all_metrics().unwrap();
    assert_eq!(metrics.len(), 3);
    for metric in &metrics {
        assert!(metric.cpu >= 5.0 && metric.cpu < 95.0, "cpu {}", metric.cpu);
        assert!(
            metric.memory >= 5.0 && metric.memory < 95.0,
            "memory {}",
            metric.memory
        );
        assert!(
            metric.latency_ms >= 20.0 && metric.latency_ms < 500.0,
            "latency {}",
            metric.latency_ms
        );
        assert!(
            metric.error_rate >= 0.0 && metric.error_rate < 0.2,
            "error_rate {}",
            metric.error_rate
        );
        assert_eq!(metric.last_heartbeat, 500.0);
    }
}

#[test]
fn test_step_high_cpu_fault_exceeds_alert_threshold() {
    let repo = common::test_repo(0.0);
    repo.set_fault("auth-service", FaultMode::HighCpu).unwrap();
    for round in 0..10 {
        simulator::step(&repo, round as f64);
        let metrics = repo.all_metrics().unwrap();
        assert!(metrics[0].cpu >= 90.0, "round {round}: cpu {}", metrics[0].cpu);
    }
}

#[test]
fn test_step_high_error_rate_fault_exceeds_alert_threshold() {
    let repo = common::test_repo(0.0);
    repo.set_fault("payment-service", FaultMode::HighErrorRate)
        .unwrap();
    for round in 0..10 {
        simulator::step(&repo, round as f64);
        let metrics = repo.all_metrics().unwrap();
        assert!(
            metrics[1].error_rate >= 0.2,
            "round {round}: error_rate {}",
            metrics[1].error_rate
        );
    }
}

#[test]
fn test_step_down_fault_suppresses_heartbeat() {
    let repo = common::test_repo(0.0);
    repo.set_fault("reporting-service", FaultMode::Down).unwrap();
    simulator::step(&repo, 42.0);
    let metrics = repo.all_metrics().unwrap();
    // Faulted service kept its initial sample; the rest heartbeated.
    assert_eq!(metrics[2].last_heartbeat, 0.0);
    assert_eq!(metrics[0].last_heartbeat, 42.0);
    assert_eq!(metrics[1].last_heartbeat, 42.0);
}

#[test]
fn test_step_resumes_after_fault_cleared() {
    let repo = common::test_repo(0.0);
    repo.set_fault("reporting-service", FaultMode::Down).unwrap();
    simulator::step(&repo, 10.0);
    repo.clear_fault("reporting-service").unwrap();
    simulator::step(&repo, 20.0);
    let metrics = repo.all_metrics().unwrap();
    assert_eq!(metrics[2].last_heartbeat, 20.0);
}
