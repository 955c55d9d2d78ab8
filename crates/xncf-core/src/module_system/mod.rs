//! # Xncf Module System
//!
//! Everything about the set of installable modules and deciding what to do
//! with each of them.
//!
//! - **[`descriptor`]**: [`ModuleDescriptor`], the static metadata a module ships
//!   with, and the manifest format it is loaded from.
//! - **[`registry`]**: [`ModuleRegistry`], the immutable, injected list of known
//!   descriptors.
//! - **[`dependency`]**: install ordering across declared module dependencies.
//! - **[`scan`]**: the ScanAndInstall driver. Classifies each eligible module as
//!   Install, Update or Skip against a snapshot of installed records, writes the
//!   record, and reports an [`InstallEvent`] per module that changed.
//! - **[`error`]**: [`ModuleSystemError`](error::ModuleSystemError).
pub mod dependency;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod scan;

pub use descriptor::{ModuleDescriptor, ModuleManifest};
pub use error::ModuleSystemError;
pub use registry::ModuleRegistry;
pub use scan::{InstallEvent, InstallObserver, InstallOrUpdate, ScanError, ScanReport, ScanTarget};
// Test module declaration
#[cfg(test)]
mod tests;
