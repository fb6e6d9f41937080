// Console consumer for the live snapshot feed.
//
// Usage:
//   healthwatch-tail [ws://127.0.0.1:8000/ws/snapshot]
//   healthwatch-tail fault <service_name> <mode> [http://127.0.0.1:8000]

use anyhow::Result;
use healthwatch::control_client::ControlClient;
use healthwatch::models::{FaultMode, SystemSnapshot};
use healthwatch::stream_client::SnapshotStreamClient;
use tracing_subscriber::EnvFilter;

const DEFAULT_FEED_URL: &str = "ws://127.0.0.1:8000/ws/snapshot";
const DEFAULT_CONTROL_URL: &str = "http://127.0.0.1:8000";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("fault") => send_fault(&args[1..]).await,
        _ => tail(args.first().map(String::as_str).unwrap_or(DEFAULT_FEED_URL)).await,
    }
}

async fn send_fault(args: &[String]) -> Result<()> {
    let (service_name, mode) = match args {
        [service, mode, ..] => (service.as_str(), mode.parse::<FaultMode>()),
        _ => anyhow::bail!("usage: healthwatch-tail fault <service_name> <mode> [base_url]"),
    };
    let mode = mode.map_err(|e| anyhow::anyhow!(e))?;
    let base_url = args.get(2).map(String::as_str).unwrap_or(DEFAULT_CONTROL_URL);

    let control = ControlClient::new(base_url)?;
    let outcome = control.set_fault(service_name, mode).await;
    println!("{service_name} -> {mode}: {outcome:?}");
    Ok(())
}

async fn tail(url: &str) -> Result<()> {
    let mut client = SnapshotStreamClient::new();
    let mut status_rx = client.watch_status();
    let mut snapshot_rx = client.watch_snapshots();
    let Some(mut faults) = client.take_faults() else {
        anyhow::bail!("fault channel already taken");
    };

    println!("Tailing {url}");
    client.open(url);

    loop {
        tokio::select! {
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("connection: {}", *status_rx.borrow_and_update());
            }
            changed = snapshot_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshot_rx.borrow_and_update().clone();
                render(&snapshot);
            }
            Some(fault) = faults.recv() => {
                tracing::warn!(%fault, "stream fault");
            }
            _ = tokio::signal::ctrl_c() => {
                client.close();
                println!("connection: {}", client.status());
                break;
            }
        }
    }
    Ok(())
}

fn render(snapshot: &SystemSnapshot) {
    println!("--- {} services ---", snapshot.services.len());
    for service in &snapshot.services {
        if service.status.is_down() {
            // Last-known numbers are stale once a service is DOWN; never
            // print them as if live.
            println!("  {:<20} {:<10} metrics stale", service.service_name, service.status);
        } else {
            println!(
                "  {:<20} {:<10} cpu {:5.1}%  mem {:5.1}%  lat {:6.1}ms  err {:.2}",
                service.service_name,
                service.status,
                service.cpu,
                service.memory,
                service.latency_ms,
                service.error_rate,
            );
        }
    }
    for alert in &snapshot.alerts {
        println!(
            "  ! {} - {}: {} - {}",
            alert.severity, alert.service_name, alert.type_, alert.message
        );
    }
}
