pub mod audit;
pub mod installer;
pub mod kernel;
pub mod module_system;
pub mod storage;

// Re-export key public types for easier use by the binary
pub use kernel::Application;
pub use kernel::error::{Error, Result};
pub use module_system::{InstallOrUpdate, ModuleDescriptor, ModuleRegistry, ScanTarget};
pub use installer::{InstallationCoordinator, InstallationResult, MenuSynchronizer};
pub use storage::{InstallerConfig, MemoryStore, MenuStore, ModuleRecordStore};
pub use audit::{AuditEntry, AuditSink, LogAuditSink};
