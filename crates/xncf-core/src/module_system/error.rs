//! # Xncf Module System Errors
//!
//! [`ModuleSystemError`] covers everything the install decision can reject:
//! bad input, modules unknown to the registry, exact duplicates of an installed
//! version, a missing parent menu, and broken dependency declarations.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModuleSystemError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Module '{uid}' was not found")]
    NotFound { uid: String },

    #[error("Module '{uid}' is already installed at version {version}")]
    AlreadyInstalled { uid: String, version: String },

    #[error("Menu '{name}' was not found")]
    MenuNotFound { name: String },

    #[error("Module '{uid}' is registered more than once")]
    DuplicateModule { uid: String },

    #[error("Module '{uid}' depends on '{dependency}', which is not registered")]
    MissingDependency { uid: String, dependency: String },

    #[error("Cyclic dependency detected between modules: {0:?}")]
    CyclicDependency(Vec<String>),
}

impl ModuleSystemError {
    pub fn not_found(uid: impl Into<String>) -> Self {
        ModuleSystemError::NotFound { uid: uid.into() }
    }
}
