// Control client tests: outcomes are reported, never thrown, and a
// command for a service already in flight is refused locally.

mod common;

use axum::{Router, http::StatusCode, routing::post};
use healthwatch::control_client::{ControlClient, ControlOutcome};
use healthwatch::models::FaultMode;
use std::sync::Arc;
use tokio::time::Duration;

#[tokio::test]
async fn test_set_fault_is_accepted_and_recorded() {
    let (app, _tx, repo) = common::test_app();
    let (addr, _server) = common::serve_app(app).await;

    let control = ControlClient::new(format!("http://{addr}")).unwrap();
    let outcome = control.set_fault("payment-service", FaultMode::Down).await;
    assert_eq!(outcome, ControlOutcome::Accepted);
    assert_eq!(repo.fault("payment-service").unwrap(), FaultMode::Down);
}

#[tokio::test]
async fn test_set_fault_unknown_service_is_rejected() {
    let (app, _tx, _repo) = common::test_app();
    let (addr, _server) = common::serve_app(app).await;

    let control = ControlClient::new(format!("http://{addr}")).unwrap();
    let outcome = control.set_fault("nonexistent", FaultMode::HighCpu).await;
    assert_eq!(outcome, ControlOutcome::Rejected(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_set_fault_against_failing_endpoint_does_not_throw() {
    async fn always_500() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
    let app = Router::new().route("/services/{service_name}/fault", post(always_500));
    let (addr, _server) = common::serve_app(app).await;

    let control = ControlClient::new(format!("http://{addr}")).unwrap();
    let outcome = control.set_fault("api", FaultMode::Down).await;
    assert_eq!(
        outcome,
        ControlOutcome::Rejected(StatusCode::INTERNAL_SERVER_ERROR)
    );
}

#[tokio::test]
async fn test_set_fault_unreachable_endpoint_reports_locally() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let control = ControlClient::new(format!("http://{addr}")).unwrap();
    let outcome = control.set_fault("api", FaultMode::None).await;
    assert_eq!(outcome, ControlOutcome::Unreachable);
}

#[tokio::test]
async fn test_concurrent_command_for_same_service_is_busy() {
    async fn slow_ok() -> StatusCode {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        StatusCode::OK
    }
    let app = Router::new().route("/services/{service_name}/fault", post(slow_ok));
    let (addr, _server) = common::serve_app(app).await;

    let control = Arc::new(ControlClient::new(format!("http://{addr}")).unwrap());
    let first = {
        let control = control.clone();
        tokio::spawn(async move { control.set_fault("auth-service", FaultMode::HighCpu).await })
    };
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Same service while the first command is outstanding: refused locally.
    let second = control.set_fault("auth-service", FaultMode::Down).await;
    assert_eq!(second, ControlOutcome::Busy);

    // The guard is per service, and it is released once the first command
    // completes.
    assert_eq!(first.await.unwrap(), ControlOutcome::Accepted);
    let third = control.set_fault("auth-service", FaultMode::None).await;
    assert_eq!(third, ControlOutcome::Accepted);
}
