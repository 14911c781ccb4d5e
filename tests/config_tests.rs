// Config loading and validation tests

use kubedash_console::config::Config;

const VALID_CONFIG: &str = r#"
backend_url: http://dashboard-backend:8888
listen_port: 9000
poll:
  pod_health_interval_secs: 10
  dashboard_interval_secs: 15
actions:
  repoll_delay_ms: 2000
notifications:
  dismiss_after_ms: 4000
"#;

#[test]
fn loads_full_config() {
    let cfg = Config::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(cfg.backend_url, "http://dashboard-backend:8888");
    assert_eq!(cfg.listen_port, 9000);
    assert_eq!(cfg.poll.pod_health_interval_secs, 10);
    assert_eq!(cfg.poll.dashboard_interval_secs, 15);
    assert_eq!(cfg.actions.repoll_delay_ms, 2000);
    assert_eq!(cfg.notifications.dismiss_after_ms, 4000);
}

#[test]
fn minimal_config_uses_defaults() {
    let cfg = Config::load_from_str("backend_url: http://localhost:8888\n").expect("load");
    assert_eq!(cfg.listen_port, 8790);
    assert_eq!(cfg.poll.pod_health_interval_secs, 10);
    assert_eq!(cfg.poll.dashboard_interval_secs, 10);
    assert_eq!(cfg.actions.repoll_delay_ms, 3000);
    assert_eq!(cfg.notifications.dismiss_after_ms, 5000);
}

#[test]
fn backend_url_trailing_slash_is_trimmed() {
    let cfg = Config::load_from_str("backend_url: http://localhost:8888/\n").expect("load");
    assert_eq!(cfg.backend_url, "http://localhost:8888");
}

#[test]
fn rejects_missing_backend_url() {
    assert!(Config::load_from_str("listen_port: 9000\n").is_err());
}

#[test]
fn rejects_empty_backend_url() {
    let err = Config::load_from_str("backend_url: \"\"\n").unwrap_err();
    assert!(err.to_string().contains("backend_url"));
}

#[test]
fn rejects_zero_poll_interval() {
    let bad = VALID_CONFIG.replace("pod_health_interval_secs: 10", "pod_health_interval_secs: 0");
    let err = Config::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("poll intervals"));
}

#[test]
fn listen_addr_binds_all_interfaces() {
    let cfg = Config::load_from_str(VALID_CONFIG).expect("load");
    assert_eq!(cfg.listen_addr(), "0.0.0.0:9000");
}
