//! # Xncf Core Kernel Errors
//!
//! Defines the crate-wide [`Error`] returned by every public operation.
//!
//! Subsystem errors ([`ModuleSystemError`], [`StorageSystemError`]) convert into
//! it with `?`. Nothing in the install workflow retries or swallows an error;
//! callers get the first failure as-is.
use std::result::Result as StdResult;

use crate::module_system::error::ModuleSystemError;
use crate::storage::error::StorageSystemError;
use thiserror::Error as ThisError;

/// Custom error type for the Xncf installer
#[derive(Debug, ThisError)]
pub enum Error {
    /// Specific, typed module system error (registry, scan, install decisions)
    #[error("Module system error: {0}")]
    ModuleSystem(#[from] ModuleSystemError),

    /// Specific, typed storage system error (records, menus, snapshots, config)
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// Error occurring during a specific kernel lifecycle phase.
    #[error("Kernel lifecycle error during {phase}: {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        component_name: Option<String>,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("Initialize")]
    Initialize,
    #[error("Start")]
    Start,
    #[error("Shutdown")]
    Shutdown,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// The module-system error inside this error, if that is what it wraps.
    pub fn as_module_error(&self) -> Option<&ModuleSystemError> {
        match self {
            Error::ModuleSystem(e) => Some(e),
            _ => None,
        }
    }

    /// The storage error inside this error, if that is what it wraps.
    pub fn as_storage_error(&self) -> Option<&StorageSystemError> {
        match self {
            Error::StorageSystem(e) => Some(e),
            _ => None,
        }
    }
}
