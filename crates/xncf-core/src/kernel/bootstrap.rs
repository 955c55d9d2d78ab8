use std::sync::Arc;

use crate::audit::{AuditSink, LogAuditSink};
use crate::installer::InstallationCoordinator;
use crate::kernel::component::KernelComponent;
use crate::kernel::constants;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::module_system::ModuleRegistry;
use crate::storage::{InstallerConfig, MemoryStore, MenuNode};

/// Main application struct wiring the registry, the store and the installer
pub struct Application {
    initialized: bool,
    config: Arc<InstallerConfig>,
    registry: Arc<ModuleRegistry>,
    store: Arc<MemoryStore>,
    installer: InstallationCoordinator,
    // Initialized in order, stopped in reverse
    components: Vec<Arc<dyn KernelComponent>>,
}

impl Application {
    /// Creates an application that audits through the `log` facade.
    pub fn new(config: InstallerConfig, registry: ModuleRegistry, store: MemoryStore) -> Self {
        Self::with_audit_sink(config, registry, store, Arc::new(LogAuditSink))
    }

    pub fn with_audit_sink(
        config: InstallerConfig,
        registry: ModuleRegistry,
        store: MemoryStore,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        log::info!("Initializing {} v{}", constants::APP_NAME, constants::APP_VERSION);
        let config = Arc::new(config);
        let registry = Arc::new(registry);
        let store = Arc::new(store);
        let installer = InstallationCoordinator::new(
            registry.clone(),
            store.clone(),
            store.clone(),
            audit,
            config.clone(),
        );
        let components: Vec<Arc<dyn KernelComponent>> = vec![store.clone() as Arc<dyn KernelComponent>];

        Application {
            initialized: false,
            config,
            registry,
            store,
            installer,
            components,
        }
    }

    /// Initialize components, then make sure the top-level module menu exists.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Err(Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Initialize,
                component_name: None,
                message: "Application already initialized".to_string(),
                source: None,
            });
        }

        for component in &self.components {
            log::debug!("Initializing component: {}", component.name());
            component
                .initialize()
                .await
                .map_err(|e| lifecycle_error(KernelLifecyclePhase::Initialize, component.name(), e))?;
            component
                .start()
                .await
                .map_err(|e| lifecycle_error(KernelLifecyclePhase::Start, component.name(), e))?;
        }

        self.seed_top_menu().await;
        self.initialized = true;
        Ok(())
    }

    /// Stop components in reverse order. Persists the store snapshot, if any.
    pub async fn shutdown(&mut self) -> Result<()> {
        for component in self.components.iter().rev() {
            log::debug!("Stopping component: {}", component.name());
            component
                .stop()
                .await
                .map_err(|e| lifecycle_error(KernelLifecyclePhase::Shutdown, component.name(), e))?;
        }
        self.initialized = false;
        Ok(())
    }

    /// Platform bootstrap: the installer expects the module menu parent to exist.
    pub async fn seed_top_menu(&self) -> MenuNode {
        self.store
            .seed_top_menu(&self.config.top_menu_name, constants::EXTENSION_MODULES_MENU_ORDER)
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn installer(&self) -> &InstallationCoordinator {
        &self.installer
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }
}

fn lifecycle_error(phase: KernelLifecyclePhase, component: &str, source: Error) -> Error {
    Error::KernelLifecycleError {
        message: format!("component '{}' failed: {}", component, source),
        phase,
        component_name: Some(component.to_string()),
        source: Some(Box::new(source)),
    }
}
