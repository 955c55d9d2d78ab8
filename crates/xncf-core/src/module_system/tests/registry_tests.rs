use std::io::Write;

use tempfile::Builder;

use crate::module_system::{ModuleDescriptor, ModuleRegistry, ModuleSystemError};
use crate::storage::StorageSystemError;

fn sample() -> Vec<ModuleDescriptor> {
    vec![
        ModuleDescriptor::new("mod-a", "1.0", "Alpha"),
        ModuleDescriptor::new("mod-b", "0.3", "Beta").with_name("Beta Suite"),
    ]
}

#[test]
fn test_registry_finds_by_uid_in_registration_order() {
    let registry = ModuleRegistry::new(sample()).expect("valid registry");

    assert_eq!(registry.len(), 2);
    assert!(registry.find("mod-c").is_none());
    assert_eq!(registry.find("mod-b").map(|d| d.display_name()), Some("Beta Suite"));
    let uids: Vec<&str> = registry.descriptors().iter().map(|d| d.uid.as_str()).collect();
    assert_eq!(uids, vec!["mod-a", "mod-b"]);
}

#[test]
fn test_registry_rejects_duplicate_uid() {
    let mut descriptors = sample();
    descriptors.push(ModuleDescriptor::new("mod-a", "2.0", "Alpha Again"));

    let err = ModuleRegistry::new(descriptors).expect_err("duplicate uid");

    assert!(matches!(
        err.as_module_error(),
        Some(ModuleSystemError::DuplicateModule { uid }) if uid == "mod-a"
    ));
}

#[test]
fn test_registry_rejects_blank_uid() {
    let err = ModuleRegistry::new(vec![ModuleDescriptor::new(" ", "1.0", "Nameless")]).expect_err("blank uid");

    assert!(matches!(err.as_module_error(), Some(ModuleSystemError::InvalidInput { .. })));
}

#[test]
fn test_empty_registry_is_allowed() {
    let registry = ModuleRegistry::default();
    assert!(registry.is_empty());
    assert!(registry.find("anything").is_none());
}

#[tokio::test]
async fn test_load_json_manifest() {
    let mut file = Builder::new().suffix(".json").tempfile().expect("temp file");
    write!(
        file,
        r#"{{"modules": [
            {{"uid": "mod-x", "version": "1.0", "menu_name": "Reports", "icon": "fa fa-file"}},
            {{"uid": "mod-y", "version": "2.1", "menu_name": "Billing", "dependencies": ["mod-x"]}}
        ]}}"#
    )
    .expect("write manifest");

    let registry = ModuleRegistry::load_from_path(file.path()).await.expect("manifest loads");

    assert_eq!(registry.len(), 2);
    let reports = registry.find("mod-x").expect("mod-x registered");
    assert_eq!(reports.icon(), Some("fa fa-file"));
    assert_eq!(reports.display_name(), "Reports", "name falls back to the menu name");
    assert_eq!(registry.find("mod-y").map(|d| d.dependencies.clone()), Some(vec!["mod-x".to_string()]));
}

#[cfg(feature = "toml-config")]
#[tokio::test]
async fn test_load_toml_manifest() {
    let mut file = Builder::new().suffix(".toml").tempfile().expect("temp file");
    write!(
        file,
        r#"
[[modules]]
uid = "mod-x"
version = "1.0"
menu_name = "Reports"
"#
    )
    .expect("write manifest");

    let registry = ModuleRegistry::load_from_path(file.path()).await.expect("manifest loads");

    assert_eq!(registry.find("mod-x").map(|d| d.version.as_str()), Some("1.0"));
}

#[tokio::test]
async fn test_load_manifest_with_unknown_extension_fails() {
    let file = Builder::new().suffix(".ini").tempfile().expect("temp file");

    let err = ModuleRegistry::load_from_path(file.path()).await.expect_err("unsupported format");

    assert!(matches!(
        err.as_storage_error(),
        Some(StorageSystemError::UnsupportedConfigFormat(_))
    ));
}

#[tokio::test]
async fn test_load_missing_manifest_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");

    let err = ModuleRegistry::load_from_path(&dir.path().join("modules.json"))
        .await
        .expect_err("missing file");

    assert!(matches!(err.as_storage_error(), Some(StorageSystemError::Io { .. })));
}
