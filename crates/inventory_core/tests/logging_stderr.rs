use inventory_core::{init_from_config, init_logging, logging_status, LogTarget, LoggingConfig};

#[test]
fn config_without_dir_logs_warnings_to_stderr() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        dir: None,
    };

    assert_eq!(init_from_config(&config).unwrap(), LogTarget::Stderr);
    assert_eq!(init_from_config(&config).unwrap(), LogTarget::Stderr);
    assert_eq!(logging_status(), Some(("warn", LogTarget::Stderr)));

    let dir = tempfile::tempdir().unwrap();
    let err = init_logging("warn", dir.path()).unwrap_err();
    assert!(err.to_string().contains("refusing to switch"));
}
