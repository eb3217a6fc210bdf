//! Bootstrap Lifecycle Module
//!
//! Discovers bootstrappers, validates the hooks they expose and drives them
//! through a fixed sequence of startup phases.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Discovery & priority sort
//!    ↓
//! 2. ConfigureServices   (each bootstrapper, by priority)   ← Hook
//!    ↓
//! 3. ConfigureBuilder    (each bootstrapper, by priority)   ← Hook
//!    ↓
//! 4. Build               (service collection sealed)
//!    ↓
//! 5. InitializeServices  (each bootstrapper, by priority)   ← Hook
//!    ↓
//! 6. DecorateApp         (each bootstrapper, by priority)   ← Hook
//!    ↓
//! 7. Background drain    (async hooks settle)
//!    ↓
//! 8. Ready
//! ```
//!
//! Synchronous hooks run one after another and a failure aborts startup.
//! Asynchronous hooks are launched in priority order and keep running while
//! later hooks and phases proceed; their failures are logged by the drain.
//!
//! # Example
//!
//! ```rust,ignore
//! use bootwright::bootstrapper;
//! use bootwright::lifecycle::AppBuilder;
//! use bootwright::{ServiceCollection, ConfigService};
//!
//! pub struct CacheBootstrapper;
//!
//! #[bootstrapper(priority = 500)]
//! impl CacheBootstrapper {
//!     pub fn configure_builder(services: ServiceCollection, config: &ConfigService) -> bootwright::Result<()> {
//!         services.register(Cache::from_config(config))
//!     }
//!
//!     pub async fn initialize_services_async(cache: Arc<Cache>) -> anyhow::Result<()> {
//!         cache.warm_up().await
//!     }
//! }
//! ```

mod aliases;
mod application;
mod context;
mod discovery;
mod drain;
mod error;
mod hook;
mod manager;
mod phase;
mod readiness;
mod resolver;
mod shutdown;

pub use aliases::{HookAliases, HostProfile};
pub use application::{AppBuilder, Application};
pub use context::HookContext;
pub use discovery::{
    Bootstrap, BootstrapCandidate, BootstrapperEntry, DEFAULT_PRIORITY, Discovery,
};
pub use drain::{BackgroundTasks, DrainReport, TimeoutPolicy};
pub use error::{LifecycleError, Result};
pub use hook::{HookError, HookFn, HookFuture, HookMethod, HookShape, HookTable, IntoHookResult};
pub use manager::{LifecycleManager, RegisteredBootstrapper, Rejection};
pub use phase::{HookSlot, HookVariant, Phase};
pub use readiness::Readiness;
pub use resolver::ResolvedHookSet;
pub use shutdown::shutdown_signal;

use crate::config::BootstrapOptions;

/// Discover bootstrappers and run every phase with default options.
///
/// Returns the built application and the asynchronous hooks still running. The
/// host drains them (see [`BackgroundTasks::drain`]) before reporting ready.
pub fn bootstrap(
    builder: AppBuilder,
    discovery: &Discovery,
) -> Result<(Application, BackgroundTasks)> {
    bootstrap_with(builder, discovery, &BootstrapOptions::default())
}

/// [`bootstrap`] with explicit options.
pub fn bootstrap_with(
    builder: AppBuilder,
    discovery: &Discovery,
    options: &BootstrapOptions,
) -> Result<(Application, BackgroundTasks)> {
    LifecycleManager::discover(options, discovery).bootstrap(builder)
}
