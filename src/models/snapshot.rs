// The unit of state pushed by the feed

use serde::{Deserialize, Serialize};

use super::{Alert, ServiceHealth};

/// Complete point-in-time state of all monitored services and active
/// alerts. A frame is accepted only as a whole; there is no partial merge
/// across snapshots. The default value (both lists empty) is what a stream
/// client holds before the first valid frame arrives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub services: Vec<ServiceHealth>,
    pub alerts: Vec<Alert>,
}
