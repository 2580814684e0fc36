use std::time::Duration;

use alert_relay::config::{Config, ConfigServerKind};
use anyhow::Result;

/// Test: Only the value "gcs" selects the storage-backed resolver
#[test]
fn test_config_server_type_selection() -> Result<()> {
    // Env mutation is process-global; every load() case stays in this one
    // test so nothing races the variables.
    unsafe { std::env::set_var("CONFIG_SERVER_TYPE", "plaintext") };
    let config = Config::load()?;
    assert!(
        matches!(config.config_server_type, ConfigServerKind::Memory),
        "got: {:?}",
        config.config_server_type
    );

    unsafe { std::env::set_var("CONFIG_SERVER_TYPE", "gcs") };
    let config = Config::load()?;
    assert!(
        matches!(config.config_server_type, ConfigServerKind::Gcs),
        "got: {:?}",
        config.config_server_type
    );

    unsafe { std::env::remove_var("CONFIG_SERVER_TYPE") };
    let config = Config::load()?;
    assert!(
        matches!(config.config_server_type, ConfigServerKind::Memory),
        "got: {:?}",
        config.config_server_type
    );

    assert_eq!(config.server_port, 8080);
    assert_eq!(config.gcs_config_object, "config_params.json");
    assert_eq!(config.outbound_timeout(), Duration::from_secs(10));

    Ok(())
}

/// Test: The config bucket name derives from the project id
#[test]
fn test_gcs_config_bucket_requires_project_id() -> Result<()> {
    let config = Config {
        server_port: 8080,
        config_server_type: ConfigServerKind::Gcs,
        project_id: Some("demo".to_string()),
        gcs_config_object: "config_params.json".to_string(),
        storage_emulator_host: None,
        outbound_timeout_seconds: 10,
    };

    assert_eq!(config.gcs_config_bucket()?, "gcs_config_bucket_demo");

    let config = Config {
        project_id: None,
        ..config
    };
    assert!(config.gcs_config_bucket().is_err());

    Ok(())
}
