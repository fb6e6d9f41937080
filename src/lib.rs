// Library for tests and the binaries to access modules

pub mod alerts;
pub mod config;
pub mod control_client;
pub mod metrics_repo;
pub mod models;
pub mod routes;
pub mod simulator;
pub mod stream_client;
pub mod version;
pub mod worker;
