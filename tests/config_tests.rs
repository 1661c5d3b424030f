// Agent configuration parsing and validation

use std::io::Write;
use std::time::Duration;

use wgmon::config::AppConfig;

const VALID_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[sampling]
window_ms = 500
include_swap = true

[wireguard]
interface = "wg1"
command_timeout_secs = 10
"#;

#[test]
fn test_valid_config_parses() {
    let config = AppConfig::load_from_str(VALID_CONFIG).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.sampling.window_ms, 500);
    assert!(config.sampling.include_swap);
    assert_eq!(config.wireguard.interface, "wg1");
    assert_eq!(config.wireguard.command_timeout_secs, 10);
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = AppConfig::load_from_str("").unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 5665);
    assert_eq!(config.sampling.window_ms, 1000);
    assert!(!config.sampling.include_swap);
    assert_eq!(config.wireguard.interface, "wg0");
    assert!(config.wireguard.command.is_empty());
    assert_eq!(config.wireguard.command_timeout_secs, 5);
}

#[test]
fn test_partial_config_fills_missing_sections() {
    let config = AppConfig::load_from_str("[sampling]\nwindow_ms = 2000\n").unwrap();

    assert_eq!(config.sampling.window_ms, 2000);
    assert_eq!(config.server.port, 5665);
    assert_eq!(config.wireguard.interface, "wg0");
}

#[test]
fn test_rejects_zero_port() {
    let config = VALID_CONFIG.replace("port = 8080", "port = 0");
    let err = AppConfig::load_from_str(&config).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_rejects_zero_window() {
    let config = VALID_CONFIG.replace("window_ms = 500", "window_ms = 0");
    let err = AppConfig::load_from_str(&config).unwrap_err();
    assert!(err.to_string().contains("sampling.window_ms"));
}

#[test]
fn test_rejects_window_above_one_minute() {
    let config = VALID_CONFIG.replace("window_ms = 500", "window_ms = 60001");
    let err = AppConfig::load_from_str(&config).unwrap_err();
    assert!(err.to_string().contains("sampling.window_ms"));
}

#[test]
fn test_rejects_command_timeout_out_of_range() {
    for bad in ["command_timeout_secs = 0", "command_timeout_secs = 121"] {
        let config = VALID_CONFIG.replace("command_timeout_secs = 10", bad);
        let err = AppConfig::load_from_str(&config).unwrap_err();
        assert!(err.to_string().contains("command_timeout_secs"), "{bad}");
    }
}

#[test]
fn test_rejects_empty_interface_without_command_override() {
    let config = VALID_CONFIG.replace("interface = \"wg1\"", "interface = \"\"");
    let err = AppConfig::load_from_str(&config).unwrap_err();
    assert!(err.to_string().contains("wireguard.interface"));
}

#[test]
fn test_allows_empty_interface_with_command_override() {
    let config = VALID_CONFIG.replace(
        "interface = \"wg1\"",
        "interface = \"\"\ncommand = [\"cat\", \"/tmp/dump\"]",
    );
    let config = AppConfig::load_from_str(&config).unwrap();
    assert_eq!(config.dump_command(), vec!["cat", "/tmp/dump"]);
}

#[test]
fn test_rejects_invalid_toml() {
    assert!(AppConfig::load_from_str("[server\nport = 1").is_err());
}

#[test]
fn test_dump_command_defaults_to_wg_show() {
    let config = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    assert_eq!(config.dump_command(), vec!["wg", "show", "wg1", "dump"]);
}

#[test]
fn test_collect_options_reflect_sampling_section() {
    let config = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    let options = config.collect_options();

    assert_eq!(options.window, Duration::from_millis(500));
    assert!(options.include_swap);
    assert_eq!(config.command_timeout(), Duration::from_secs(10));
}

// Both env-var cases live in one test; CONFIG_FILE is process-global and
// the harness runs tests in parallel.
#[test]
fn test_load_honors_config_file_env() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(VALID_CONFIG.as_bytes()).unwrap();

    unsafe {
        std::env::set_var("CONFIG_FILE", file.path());
    }
    let config = AppConfig::load().unwrap();
    assert_eq!(config.server.port, 8080);

    unsafe {
        std::env::set_var("CONFIG_FILE", "/nonexistent/wgmon.toml");
    }
    let config = AppConfig::load().unwrap();
    assert_eq!(config.server.port, 5665);

    unsafe {
        std::env::remove_var("CONFIG_FILE");
    }
}
