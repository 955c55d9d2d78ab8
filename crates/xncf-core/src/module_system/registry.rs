use std::collections::HashMap;
use std::path::Path;

use crate::kernel::error::Result;
use crate::module_system::descriptor::{ModuleDescriptor, ModuleManifest};
use crate::module_system::error::ModuleSystemError;
use crate::storage::config::{read_to_string, ConfigFormat};
use crate::storage::error::StorageSystemError;

/// Read-only registry of the modules known to this process.
///
/// Populated once at startup and never mutated afterwards; the installer
/// borrows it through an `Arc`. Descriptor order is the order modules were
/// registered in and is the stable order scans walk.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    descriptors: Vec<ModuleDescriptor>,
    /// uid -> position in `descriptors`
    index: HashMap<String, usize>,
}

impl ModuleRegistry {
    /// Build a registry, rejecting empty and duplicate uids.
    pub fn new(descriptors: Vec<ModuleDescriptor>) -> Result<Self> {
        let mut index = HashMap::with_capacity(descriptors.len());
        for (position, descriptor) in descriptors.iter().enumerate() {
            if descriptor.uid.trim().is_empty() {
                return Err(ModuleSystemError::InvalidInput {
                    message: format!("module '{}' has an empty uid", descriptor.display_name()),
                }
                .into());
            }
            if index.insert(descriptor.uid.clone(), position).is_some() {
                return Err(ModuleSystemError::DuplicateModule {
                    uid: descriptor.uid.clone(),
                }
                .into());
            }
        }
        log::debug!("Module registry built with {} module(s)", descriptors.len());
        Ok(Self { descriptors, index })
    }

    /// Load descriptors from a manifest file (`.json`, `.yaml`/`.yml`, `.toml`).
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| StorageSystemError::UnsupportedConfigFormat(path.display().to_string()))?;
        let content = read_to_string(path, "load_module_manifest").await?;
        let manifest: ModuleManifest = format.decode(&content)?;
        log::info!("Loaded {} module descriptor(s) from {}", manifest.modules.len(), path.display());
        Self::new(manifest.modules)
    }

    /// All descriptors in registration order
    pub fn descriptors(&self) -> &[ModuleDescriptor] {
        &self.descriptors
    }

    pub fn find(&self, uid: &str) -> Option<&ModuleDescriptor> {
        self.position(uid).map(|position| &self.descriptors[position])
    }

    pub(crate) fn position(&self, uid: &str) -> Option<usize> {
        self.index.get(uid).copied()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
