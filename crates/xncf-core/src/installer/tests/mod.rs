pub mod menu_tests;

use std::sync::Arc;

use crate::audit::MemoryAuditSink;
use crate::installer::InstallationCoordinator;
use crate::kernel::constants;
use crate::module_system::{ModuleDescriptor, ModuleRegistry};
use crate::storage::{InstallerConfig, MemoryStore, MenuNode};

/// Shared fixture: one store, one audit sink, and an installer over them.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub audit: Arc<MemoryAuditSink>,
    pub installer: InstallationCoordinator,
    pub config: Arc<InstallerConfig>,
}

impl Harness {
    /// Installer over `descriptors` with default config and the top menu seeded
    pub async fn seeded(descriptors: Vec<ModuleDescriptor>) -> (Self, MenuNode) {
        let harness = Self::unseeded(descriptors, InstallerConfig::default());
        let top = harness
            .store
            .seed_top_menu(constants::EXTENSION_MODULES_MENU_NAME, constants::EXTENSION_MODULES_MENU_ORDER)
            .await;
        (harness, top)
    }

    /// Installer over `descriptors` with an empty store
    pub fn unseeded(descriptors: Vec<ModuleDescriptor>, config: InstallerConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let audit = Arc::new(MemoryAuditSink::new());
        let config = Arc::new(config);
        let installer = installer_over(descriptors, &store, &audit, &config);
        Self {
            store,
            audit,
            installer,
            config,
        }
    }

    /// Same store and audit sink, new registry contents (e.g. after a module upgrade)
    pub fn with_registry(&self, descriptors: Vec<ModuleDescriptor>) -> Self {
        Self {
            store: self.store.clone(),
            audit: self.audit.clone(),
            installer: installer_over(descriptors, &self.store, &self.audit, &self.config),
            config: self.config.clone(),
        }
    }
}

fn installer_over(
    descriptors: Vec<ModuleDescriptor>,
    store: &Arc<MemoryStore>,
    audit: &Arc<MemoryAuditSink>,
    config: &Arc<InstallerConfig>,
) -> InstallationCoordinator {
    let registry = ModuleRegistry::new(descriptors).expect("test registry should be valid");
    InstallationCoordinator::new(
        Arc::new(registry),
        store.clone(),
        store.clone(),
        audit.clone(),
        config.clone(),
    )
}

/// The "Reports" module used throughout the scenarios
pub fn reports(version: &str) -> ModuleDescriptor {
    ModuleDescriptor::new("mod-x", version, "Reports")
}
