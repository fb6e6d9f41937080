// Config loading and validation tests

use healthwatch::config::AppConfig;

const VALID_CONFIG: &str = r#"
[server]
port = 8000
host = "0.0.0.0"

[simulation]
services = ["auth-service", "payment-service", "reporting-service"]
tick_interval_ms = 1000

[publishing]
snapshot_interval_ms = 1000
broadcast_capacity = 16

[monitoring]
high_cpu_percent = 85.0
high_error_rate = 0.10
heartbeat_timeout_secs = 5.0
stats_log_interval_secs = 60
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.simulation.services.len(), 3);
    assert_eq!(config.simulation.tick_interval_ms, 1000);
    assert_eq!(config.publishing.snapshot_interval_ms, 1000);
    assert_eq!(config.publishing.broadcast_capacity, 16);
    assert_eq!(config.monitoring.stats_log_interval_secs, 60);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8000", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_service_list() {
    let bad = VALID_CONFIG.replace(
        r#"services = ["auth-service", "payment-service", "reporting-service"]"#,
        "services = []",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("simulation.services"));
}

#[test]
fn test_config_validation_rejects_duplicate_service_names() {
    let bad = VALID_CONFIG.replace(
        r#"services = ["auth-service", "payment-service", "reporting-service"]"#,
        r#"services = ["auth-service", "auth-service"]"#,
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn test_config_validation_rejects_tick_interval_zero() {
    let bad = VALID_CONFIG.replace("tick_interval_ms = 1000", "tick_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("tick_interval_ms"));
}

#[test]
fn test_config_validation_rejects_snapshot_interval_zero() {
    let bad = VALID_CONFIG.replace("snapshot_interval_ms = 1000", "snapshot_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("snapshot_interval_ms"));
}

#[test]
fn test_config_validation_rejects_broadcast_capacity_zero() {
    let bad = VALID_CONFIG.replace("broadcast_capacity = 16", "broadcast_capacity = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("broadcast_capacity"));
}

#[test]
fn test_config_validation_rejects_error_rate_above_one() {
    let bad = VALID_CONFIG.replace("high_error_rate = 0.10", "high_error_rate = 1.5");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("high_error_rate"));
}

#[test]
fn test_config_validation_rejects_heartbeat_timeout_zero() {
    let bad = VALID_CONFIG.replace("heartbeat_timeout_secs = 5.0", "heartbeat_timeout_secs = 0.0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("heartbeat_timeout_secs"));
}

#[test]
fn test_config_validation_rejects_stats_log_interval_zero() {
    let bad = VALID_CONFIG.replace(
        "stats_log_interval_secs = 60",
        "stats_log_interval_secs = 0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stats_log_interval_secs"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_threshold_defaults_when_omitted() {
    let trimmed = VALID_CONFIG
        .replace("high_cpu_percent = 85.0\n", "")
        .replace("high_error_rate = 0.10\n", "")
        .replace("heartbeat_timeout_secs = 5.0\n", "");
    let config = AppConfig::load_from_str(&trimmed).expect("defaults");
    assert_eq!(config.monitoring.high_cpu_percent, 85.0);
    assert_eq!(config.monitoring.high_error_rate, 0.10);
    assert_eq!(config.monitoring.heartbeat_timeout_secs, 5.0);
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.simulation.services.len(), 3);
}
