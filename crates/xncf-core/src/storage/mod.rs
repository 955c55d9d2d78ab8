pub mod config;
pub mod error;
pub mod memory;
pub mod model;
pub mod provider;

/// Re-export key types
pub use config::{BootstrapModule, ConfigFormat, InstallerConfig};
pub use error::StorageSystemError;
pub use memory::{MemoryStore, StoreSnapshot};
pub use model::{
    MenuDraft, MenuNode, ModuleRecord, ModuleRecordDto, OrderingType, PagedList, PermissionGrant,
    RecordSortKey,
};
pub use provider::{MenuStore, ModuleRecordStore, Predicate};

// Test module declaration
#[cfg(test)]
mod tests;
