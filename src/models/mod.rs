// Domain models shared by the feed server and its clients

mod alert;
mod fault;
mod service;
mod snapshot;

pub use alert::{Alert, AlertSeverity};
pub use fault::{FaultAck, FaultMode, SetFaultRequest};
pub use service::{ServiceHealth, ServiceMetric, ServiceStatus};
pub use snapshot::SystemSnapshot;
