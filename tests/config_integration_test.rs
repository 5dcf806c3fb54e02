use std::fs;
use std::time::Duration;

use clap::Parser;
use tempfile::tempdir;

use devbizops::app;
use devbizops::cli::Args;
use devbizops::display::RenderFormat;
use devbizops::logging::{LogDestination, LogFormat};

const CONFIG: &str = r#"
[base]
console-level = "info"
log-format = "json"

[notifications]
default-duration-ms = 4000
error-duration-ms = 12000

[display]
color = false
theme = "light"

[kiosk]
error-duration-ms = 0
console-level = "error"
"#;

#[test]
fn test_config_file_drives_session_setup() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("devbizops.toml");
    fs::write(&config_path, CONFIG).expect("Failed to write config file");

    let args = Args::try_parse_from(["devbizops", "--config-file", config_path.to_str().unwrap()]).unwrap();
    let config = app::load_configuration(&args).unwrap();

    let notifications = app::load_notification_config(&config).unwrap();
    assert_eq!(notifications.default_duration, Duration::from_millis(4000));
    assert_eq!(notifications.error_duration, Duration::from_millis(12000));
    assert_eq!(notifications.success_duration, Duration::from_millis(5000));

    let log_config = app::configure_logging(&args, &config).unwrap();
    assert_eq!(log_config.console_level, log::LevelFilter::Info);
    assert_eq!(log_config.format, LogFormat::Json);
    assert_eq!(log_config.destination, LogDestination::Console);

    let colours = app::create_colour_manager(&args, &config).unwrap();
    assert!(!colours.colours_enabled());
}

#[test]
fn test_config_section_selection() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("devbizops.toml");
    fs::write(&config_path, CONFIG).expect("Failed to write config file");

    let args = Args::try_parse_from([
        "devbizops",
        "--config-file",
        config_path.to_str().unwrap(),
        "--config-name",
        "kiosk",
    ])
    .unwrap();
    let config = app::load_configuration(&args).unwrap();

    let notifications = app::load_notification_config(&config).unwrap();
    assert_eq!(notifications.error_duration, Duration::ZERO);
    assert_eq!(notifications.default_duration, Duration::from_millis(4000));

    let log_config = app::configure_logging(&args, &config).unwrap();
    assert_eq!(log_config.console_level, log::LevelFilter::Error);
}

#[test]
fn test_cli_overrides_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("devbizops.toml");
    let log_path = temp_dir.path().join("session.log");
    fs::write(&config_path, CONFIG).expect("Failed to write config file");

    let args = Args::try_parse_from([
        "devbizops",
        "--config-file",
        config_path.to_str().unwrap(),
        "--debug",
        "--log-file",
        log_path.to_str().unwrap(),
        "--json",
    ])
    .unwrap();
    let config = app::load_configuration(&args).unwrap();

    let log_config = app::configure_logging(&args, &config).unwrap();
    assert_eq!(log_config.console_level, log::LevelFilter::Trace);
    assert_eq!(log_config.destination, LogDestination::Both(log_path));

    let renderer = app::create_renderer(&args, &config).unwrap();
    assert_eq!(renderer.format(), RenderFormat::Json);
}

#[test]
fn test_invalid_notification_value_names_the_key() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("devbizops.toml");
    fs::write(&config_path, "[notifications]\nwarning-duration-ms = \"soon\"\n").unwrap();

    let args = Args::try_parse_from(["devbizops", "--config-file", config_path.to_str().unwrap()]).unwrap();
    let config = app::load_configuration(&args).unwrap();

    let error = app::load_notification_config(&config).unwrap_err();
    assert!(error.to_string().contains("notifications.warning-duration-ms"));
}

#[test]
fn test_malformed_config_file_is_rejected() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("devbizops.toml");
    fs::write(&config_path, "[notifications\n").unwrap();

    let args = Args::try_parse_from(["devbizops", "--config-file", config_path.to_str().unwrap()]).unwrap();
    assert!(app::load_configuration(&args).is_err());
}

#[test]
fn test_export_config_writes_effective_values() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("devbizops.toml");
    let export_path = temp_dir.path().join("exported.toml");
    fs::write(&config_path, CONFIG).unwrap();

    let args = Args::try_parse_from(["devbizops", "--config-file", config_path.to_str().unwrap()]).unwrap();
    let config = app::load_configuration(&args).unwrap();
    app::initialization::handle_export_config(&config, &export_path).unwrap();

    let exported = fs::read_to_string(&export_path).unwrap();
    assert!(exported.contains("error-duration-ms = 12000"));
    assert!(exported.contains("theme = \"light\""));
    assert!(exported.contains("color = false"));
}
