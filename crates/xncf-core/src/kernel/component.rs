use std::fmt::Debug;

use async_trait::async_trait;

use crate::kernel::error::Result;

/// A part of the application with state to load before a run and flush after.
///
/// [`Application`](crate::kernel::Application) calls `initialize` then `start`
/// on each component in registration order, and `stop` in reverse order on
/// shutdown.
#[async_trait]
pub trait KernelComponent: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    async fn initialize(&self) -> Result<()>;

    /// Called once every component has initialized
    async fn start(&self) -> Result<()> {
        Ok(())
    }

    async fn stop(&self) -> Result<()>;
}
