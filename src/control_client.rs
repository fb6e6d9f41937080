//! Fault-injection control client.
//!
//! Sends one fire-and-forget fault command per call and reports the local
//! outcome. Failures are terminal, logged events: nothing here retries,
//! throws, or touches snapshot state — the feed is the sole source of
//! truth, and it reflects a fault only once the simulator emits it.

use crate::models::{FaultMode, SetFaultRequest};
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Local outcome of a single fault command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    /// The endpoint answered with a success status.
    Accepted,
    /// The endpoint answered with a non-success status. Not retried.
    Rejected(StatusCode),
    /// The request never got an answer (connect failure, timeout). Not
    /// retried.
    Unreachable,
    /// A command for the same service is still outstanding; this one was
    /// not sent.
    Busy,
}

/// Client for the fault control endpoint.
pub struct ControlClient {
    client: Client,
    base_url: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl ControlClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    /// Send one fault command for `service_name` and await its single
    /// response. Never returns an error and never panics; the outcome
    /// says what happened, and rejections are logged here.
    ///
    /// Duplicate concurrent submissions for the same service are refused
    /// with [`ControlOutcome::Busy`] while the first is outstanding.
    pub async fn set_fault(&self, service_name: &str, mode: FaultMode) -> ControlOutcome {
        {
            let mut in_flight = self.in_flight.lock().await;
            if !in_flight.insert(service_name.to_string()) {
                return ControlOutcome::Busy;
            }
        }
        let outcome = self.send(service_name, mode).await;
        self.in_flight.lock().await.remove(service_name);
        outcome
    }

    async fn send(&self, service_name: &str, mode: FaultMode) -> ControlOutcome {
        let url = format!("{}/services/{}/fault", self.base_url, service_name);
        debug!("POST {} mode={}", url, mode);

        let request = SetFaultRequest { mode };
        match self.client.post(&url).json(&request).send().await {
            Ok(resp) if resp.status().is_success() => ControlOutcome::Accepted,
            Ok(resp) => {
                warn!(
                    status = %resp.status(),
                    service_name,
                    mode = %mode,
                    "fault command rejected by control endpoint"
                );
                ControlOutcome::Rejected(resp.status())
            }
            Err(e) => {
                warn!(
                    error = %e,
                    service_name,
                    mode = %mode,
                    "fault command did not reach control endpoint"
                );
                ControlOutcome::Unreachable
            }
        }
    }
}
