//! Snapshot stream client.
//!
//! Maintains one live WebSocket connection to a snapshot feed, tracks the
//! connection lifecycle as an explicit state machine, and owns the latest
//! accepted [`SystemSnapshot`]. Consumers observe state through read-only
//! watch receivers; commands to the monitored system go through
//! [`crate::control_client`], never through this state.
//!
//! Malformed frames are discarded in their entirety: no status change, no
//! partial merge. The displayed snapshot simply stays stale until a valid
//! frame arrives. Discards and transport errors are reported on a typed
//! fault channel so callers (and tests) can observe them without scraping
//! logs.
//!
//! There is no automatic reconnection: DISCONNECTED and ERROR are stable
//! rest states, and leaving them takes another `open` call. Callers that
//! want retry/backoff layer it on top of this contract.

use crate::models::SystemSnapshot;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Client-local view of the connection lifecycle. Exactly one of these
/// holds at any instant; it is derived purely from lifecycle events, never
/// from snapshot content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "DISCONNECTED",
            ConnectionStatus::Connecting => "CONNECTING",
            ConnectionStatus::Connected => "CONNECTED",
            ConnectionStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a frame or the connection was dropped. Informational: none of these
/// ever propagate as a caller-visible failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StreamFault {
    #[error("malformed frame discarded: {reason}")]
    MalformedFrame { reason: String },
    #[error("transport error: {message}")]
    Transport { message: String },
}

struct Shared {
    status: watch::Sender<ConnectionStatus>,
    snapshot: watch::Sender<SystemSnapshot>,
    faults: mpsc::UnboundedSender<StreamFault>,
}

impl Shared {
    fn report(&self, fault: StreamFault) {
        // Receiver may have been dropped by an uninterested caller.
        let _ = self.faults.send(fault);
    }
}

/// Parse one text frame into a complete snapshot.
///
/// A frame is accepted only when it deserializes as a whole: `services`
/// and `alerts` both present as arrays of well-formed entries. Anything
/// else is rejected, and the caller discards the frame without touching
/// held state.
pub fn decode_frame(text: &str) -> Result<SystemSnapshot, serde_json::Error> {
    serde_json::from_str(text)
}

/// Owns one live subscription to a snapshot feed.
///
/// `open` and `close` drive the state machine:
///
/// ```text
/// DISCONNECTED --open()--> CONNECTING
/// CONNECTING --established--> CONNECTED
/// CONNECTING --transport error--> ERROR
/// CONNECTED --valid frame--> CONNECTED      (snapshot replaced whole)
/// CONNECTED --invalid frame--> CONNECTED    (no change)
/// CONNECTED --transport error--> ERROR
/// CONNECTED --close()/remote close--> DISCONNECTED
/// ERROR --close()--> DISCONNECTED
/// ```
///
/// Only one connection is active per client instance; `open` on a live
/// client tears the previous connection down first. Dropping the client
/// closes it.
pub struct SnapshotStreamClient {
    shared: Arc<Shared>,
    fault_rx: Option<mpsc::UnboundedReceiver<StreamFault>>,
    conn: Option<tokio::task::JoinHandle<()>>,
}

impl SnapshotStreamClient {
    /// A closed client: status DISCONNECTED, snapshot empty.
    pub fn new() -> Self {
        let (status, _) = watch::channel(ConnectionStatus::Disconnected);
        let (snapshot, _) = watch::channel(SystemSnapshot::default());
        let (faults, fault_rx) = mpsc::unbounded_channel();
        Self {
            shared: Arc::new(Shared {
                status,
                snapshot,
                faults,
            }),
            fault_rx: Some(fault_rx),
            conn: None,
        }
    }

    /// Begin connection establishment against `url`.
    ///
    /// Status becomes CONNECTING before this returns; everything after
    /// that is observed through the watch receivers. Any previous
    /// connection is closed first.
    pub fn open(&mut self, url: &str) {
        self.abort_conn();
        self.shared.status.send_replace(ConnectionStatus::Connecting);
        let url = url.to_string();
        let shared = self.shared.clone();
        self.conn = Some(tokio::spawn(run_connection(url, shared)));
    }

    /// Tear the connection down. Idempotent: any number of calls, in any
    /// state, and the client always lands on DISCONNECTED.
    pub fn close(&mut self) {
        self.abort_conn();
        self.shared
            .status
            .send_replace(ConnectionStatus::Disconnected);
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        *self.shared.status.borrow()
    }

    /// Latest accepted snapshot (empty until the first valid frame).
    pub fn snapshot(&self) -> SystemSnapshot {
        self.shared.snapshot.borrow().clone()
    }

    /// Read-only subscription to status transitions.
    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.shared.status.subscribe()
    }

    /// Read-only subscription to accepted snapshots.
    pub fn watch_snapshots(&self) -> watch::Receiver<SystemSnapshot> {
        self.shared.snapshot.subscribe()
    }

    /// Take the fault-event receiver. Yields `Some` once; the channel
    /// outlives reconnects, so one receiver observes every discard and
    /// transport error over the client's lifetime.
    pub fn take_faults(&mut self) -> Option<mpsc::UnboundedReceiver<StreamFault>> {
        self.fault_rx.take()
    }

    fn abort_conn(&mut self) {
        if let Some(handle) = self.conn.take() {
            handle.abort();
        }
    }
}

impl Default for SnapshotStreamClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SnapshotStreamClient {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_connection(url: String, shared: Arc<Shared>) {
    let mut stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => {
            shared.status.send_replace(ConnectionStatus::Connected);
            stream
        }
        Err(e) => {
            shared.report(StreamFault::Transport {
                message: e.to_string(),
            });
            shared.status.send_replace(ConnectionStatus::Error);
            return;
        }
    };

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match decode_frame(text.as_str()) {
                Ok(snapshot) => {
                    shared.snapshot.send_replace(snapshot);
                }
                Err(e) => shared.report(StreamFault::MalformedFrame {
                    reason: e.to_string(),
                }),
            },
            Ok(Message::Binary(_)) => shared.report(StreamFault::MalformedFrame {
                reason: "binary frame on a text protocol".into(),
            }),
            Ok(Message::Close(_)) => break,
            // Ping/pong are answered by the protocol layer.
            Ok(_) => {}
            Err(e) => {
                shared.report(StreamFault::Transport {
                    message: e.to_string(),
                });
                shared.status.send_replace(ConnectionStatus::Error);
                return;
            }
        }
    }
    shared.status.send_replace(ConnectionStatus::Disconnected);
}
