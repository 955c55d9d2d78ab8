//! # Xncf Core Kernel
//!
//! The `kernel` module holds what every other part of `xncf-core` leans on:
//!
//! - **Application Bootstrapping**: [`Application`](bootstrap::Application) wires the
//!   module registry, the store, the audit sink and the installer together.
//! - **Component Lifecycle**: the [`KernelComponent`](component::KernelComponent) trait
//!   for components that load or flush state around a run.
//! - **Core Constants**: reserved module uids and menu defaults in `constants`.
//! - **Error Handling**: the crate-wide [`Error`](error::Error) and `Result` alias.
pub mod bootstrap;
pub mod component;
pub mod constants;
pub mod error;

pub use bootstrap::Application;
pub use component::KernelComponent;
pub use error::{Error, Result};
// Test module declaration
#[cfg(test)]
mod tests;
