use std::path::Path;

use tempfile::tempdir;

use crate::kernel::constants;
use crate::kernel::error::Result;
use crate::storage::{BootstrapModule, ConfigFormat, InstallerConfig, StorageSystemError};

#[test]
fn test_format_from_extension() {
    assert_eq!(ConfigFormat::from_path(Path::new("a/b.json")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("b.JSON")), Some(ConfigFormat::Json));
    #[cfg(feature = "yaml-config")]
    assert_eq!(ConfigFormat::from_path(Path::new("b.yml")), Some(ConfigFormat::Yaml));
    #[cfg(feature = "toml-config")]
    assert_eq!(ConfigFormat::from_path(Path::new("b.toml")), Some(ConfigFormat::Toml));
    assert_eq!(ConfigFormat::from_path(Path::new("b.ini")), None);
    assert_eq!(ConfigFormat::from_path(Path::new("no_extension")), None);
}

#[test]
fn test_default_config() {
    let config = InstallerConfig::default();

    assert_eq!(config.top_menu_name, constants::EXTENSION_MODULES_MENU_NAME);
    assert_eq!(config.default_icon, "fa fa-bars");
    assert_eq!(config.record_page_size, 999);
    assert!(config.is_bootstrap(constants::SYSTEM_XNCF_MODULE_SERVICE_UID));
    assert!(config.is_bootstrap(constants::SYSTEM_XNCF_MODULE_AREAS_ADMIN_UID));
    assert!(!config.is_bootstrap("mod-x"));
    assert_eq!(config.menu_order_for(constants::SYSTEM_XNCF_MODULE_SERVICE_UID), 160);
    assert_eq!(config.menu_order_for(constants::SYSTEM_XNCF_MODULE_AREAS_ADMIN_UID), 150);
    assert_eq!(config.menu_order_for("mod-x"), 20);
    assert_eq!(config.module_start_path("mod-x"), "/Admin/XncfModule/Start/?uid=mod-x");
}

#[test]
fn test_partial_json_keeps_defaults() -> Result<()> {
    let config = InstallerConfig::parse(r#"{"top_menu_name": "Plugins", "default_menu_order": 7}"#, ConfigFormat::Json)?;

    assert_eq!(config.top_menu_name, "Plugins");
    assert_eq!(config.menu_order_for("mod-x"), 7);
    assert_eq!(config.admin_role_code, "administrator");
    assert_eq!(config.bootstrap_modules.len(), 2);
    Ok(())
}

#[test]
fn test_malformed_config_is_deserialization_error() {
    let err = InstallerConfig::parse("[1, 2", ConfigFormat::Json).expect_err("bad json");

    assert!(matches!(
        err.as_storage_error(),
        Some(StorageSystemError::DeserializationError { format, .. }) if format == "json"
    ));
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_yaml_bootstrap_override() -> Result<()> {
    let yaml = "bootstrap_modules:\n  - uid: core\n    menu_order: 1\n";

    let config = InstallerConfig::parse(yaml, ConfigFormat::Yaml)?;

    assert_eq!(config.bootstrap_modules, vec![BootstrapModule::new("core", 1)]);
    assert!(!config.is_bootstrap(constants::SYSTEM_XNCF_MODULE_SERVICE_UID));
    Ok(())
}

#[tokio::test]
async fn test_missing_config_file_gives_defaults() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");

    let config = InstallerConfig::load_or_default(&dir.path().join("installer.json")).await?;

    assert_eq!(config, InstallerConfig::default());
    Ok(())
}

#[tokio::test]
async fn test_config_save_and_load() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let config = InstallerConfig {
        default_icon: "fa fa-star".to_string(),
        ..InstallerConfig::default()
    }
    .with_bootstrap_modules(vec![BootstrapModule::new("core", 3)]);

    for name in ["installer.json", "installer.toml", "installer.yaml"] {
        let path = dir.path().join(name);
        if ConfigFormat::from_path(&path).is_none() {
            continue;
        }
        config.save(&path).await?;
        assert_eq!(InstallerConfig::load_or_default(&path).await?, config, "format of {}", name);
    }
    Ok(())
}

#[tokio::test]
async fn test_save_with_unsupported_extension_fails() {
    let dir = tempdir().expect("Failed to create temp directory");

    let err = InstallerConfig::default()
        .save(&dir.path().join("installer.ini"))
        .await
        .expect_err("unsupported");

    assert!(matches!(
        err.as_storage_error(),
        Some(StorageSystemError::UnsupportedConfigFormat(_))
    ));
}
