use std::sync::Arc;

use tempfile::tempdir;

use crate::audit::MemoryAuditSink;
use crate::kernel::bootstrap::Application;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::module_system::{ModuleDescriptor, ModuleRegistry};
use crate::storage::{InstallerConfig, MemoryStore};

fn registry() -> ModuleRegistry {
    ModuleRegistry::new(vec![ModuleDescriptor::new("mod-x", "1.0", "Reports")]).expect("valid registry")
}

#[tokio::test]
async fn test_initialize_seeds_top_menu() -> Result<()> {
    let mut app = Application::new(InstallerConfig::default(), registry(), MemoryStore::new());
    assert!(!app.is_initialized());

    app.initialize().await?;

    assert!(app.is_initialized());
    let menus = app.store().snapshot().await.menus;
    assert_eq!(menus.len(), 1);
    assert_eq!(menus[0].name, app.config().top_menu_name);
    assert!(menus[0].parent_id.is_none());
    Ok(())
}

#[tokio::test]
async fn test_double_initialize_fails() -> Result<()> {
    let mut app = Application::new(InstallerConfig::default(), registry(), MemoryStore::new());
    app.initialize().await?;

    let err = app.initialize().await.expect_err("second initialize");

    assert!(matches!(
        err,
        Error::KernelLifecycleError {
            phase: KernelLifecyclePhase::Initialize,
            component_name: None,
            ..
        }
    ));
    Ok(())
}

#[tokio::test]
async fn test_installs_survive_shutdown_and_restart() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("store.json");
    let audit = Arc::new(MemoryAuditSink::new());

    let mut app = Application::with_audit_sink(
        InstallerConfig::default(),
        registry(),
        MemoryStore::with_snapshot_path(&path),
        audit.clone(),
    );
    app.initialize().await?;
    app.installer().install_module("mod-x").await?;
    app.shutdown().await?;
    assert!(!app.is_initialized());
    assert_eq!(audit.entries().len(), 1);

    let mut restarted = Application::new(
        InstallerConfig::default(),
        registry(),
        MemoryStore::with_snapshot_path(&path),
    );
    restarted.initialize().await?;

    let snapshot = restarted.store().snapshot().await;
    assert_eq!(snapshot.modules.len(), 1);
    assert_eq!(snapshot.menus.len(), 2, "top menu is not seeded twice");
    assert_eq!(snapshot.permissions.len(), 1);
    let again = restarted.installer().install_module("mod-x").await;
    assert!(again.is_err(), "the version is recorded across restarts");
    Ok(())
}

#[tokio::test]
async fn test_component_failure_is_wrapped_with_phase() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("store.json");
    std::fs::write(&path, "garbage").expect("write file");

    let mut app = Application::new(
        InstallerConfig::default(),
        registry(),
        MemoryStore::with_snapshot_path(&path),
    );
    let err = app.initialize().await.expect_err("snapshot is unreadable");

    match err {
        Error::KernelLifecycleError {
            phase,
            component_name,
            source,
            ..
        } => {
            assert_eq!(phase, KernelLifecyclePhase::Initialize);
            assert_eq!(component_name.as_deref(), Some("MemoryStore"));
            assert!(source.is_some_and(|e| e.as_storage_error().is_some()));
        }
        other => panic!("expected a lifecycle error, got {:?}", other),
    }
    assert!(!app.is_initialized());
}
