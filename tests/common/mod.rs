// Shared test helpers

use healthwatch::metrics_repo::MetricsRepo;
use healthwatch::models::*;
use healthwatch::routes;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;

#[allow(dead_code)]
pub fn service_names() -> Vec<String> {
    vec![
        "auth-service".into(),
        "payment-service".into(),
        "reporting-service".into(),
    ]
}

#[allow(dead_code)]
pub fn sample_metric(name: &str, now: f64) -> ServiceMetric {
    ServiceMetric {
        service_name: name.into(),
        cpu: 42.0,
        memory: 55.0,
        latency_ms: 120.0,
        error_rate: 0.01,
        last_heartbeat: now,
    }
}

#[allow(dead_code)]
pub fn test_repo(now: f64) -> Arc<MetricsRepo> {
    Arc::new(MetricsRepo::new(&service_names(), now))
}

#[allow(dead_code)]
pub fn test_app() -> (
    axum::Router,
    broadcast::Sender<SystemSnapshot>,
    Arc<MetricsRepo>,
) {
    let (tx, _) = broadcast::channel(16);
    let repo = test_repo(0.0);
    let app = routes::app(tx.clone(), repo.clone(), Arc::new(AtomicUsize::new(0)));
    (app, tx, repo)
}

/// Serve `app` on an ephemeral local port for clients that need a real
/// TCP endpoint (the stream and control clients).
#[allow(dead_code)]
pub async fn serve_app(app: axum::Router) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, handle)
}
