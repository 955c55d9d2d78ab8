//! # Xncf Installer
//!
//! The install/update workflow. [`InstallationCoordinator`] checks the request
//! against the registry and the recorded modules, runs the scan, then hands
//! each installed or updated module to [`MenuSynchronizer`], which maintains
//! the module's menu node and administrator grant.
//!
//! There is no rollback. When menu synchronization fails after a record was
//! written, the module stays recorded without a menu link until
//! [`InstallationCoordinator::repair_menu`] is run for it.
pub mod coordinator;
pub mod menu;

pub use coordinator::{InstallationCoordinator, InstallationResult};
pub use menu::MenuSynchronizer;
// Test module declaration
#[cfg(test)]
mod tests;
