//! # Bootwright
//!
//! Application bootstrap orchestration with built-in dependency injection.
//!
//! Bootwright finds every type marked `#[bootstrapper]`, orders them by priority
//! and drives their hooks through a fixed startup sequence: configure services,
//! configure the builder, build, initialize services, decorate the application.
//! Asynchronous hooks run in the background; once they have all settled the
//! process flips its readiness flag exactly once.
//!
//! ## Features
//!
//! - **Compile-time discovery**: `#[bootstrapper]` registers the type, no manual list
//! - **Priorities**: lower runs first, ties keep discovery order
//! - **Hook validation**: a module exposing a non-deferred `_async` hook is rejected whole
//! - **Argument injection**: hook parameters come from the builder, the application or the container
//! - **Readiness**: `/ready` answers 503 until background hooks have drained
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bootwright::lifecycle::{AppBuilder, Discovery, Readiness};
//! use bootwright::{ServiceCollection, bootstrapper};
//! use std::sync::Arc;
//!
//! pub struct Greeting(String);
//!
//! pub struct GreetingBootstrapper;
//!
//! #[bootstrapper(priority = 100)]
//! impl GreetingBootstrapper {
//!     pub fn configure_services(services: ServiceCollection) -> bootwright::Result<()> {
//!         services.register(Greeting("hello".into()))
//!     }
//!
//!     pub async fn initialize_services_async(greeting: Arc<Greeting>) {
//!         tracing::info!("{}", greeting.0);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (app, tasks) = bootwright::bootstrap(AppBuilder::new(), &Discovery::everything())?;
//!     tokio::spawn(async move { tasks.drain(Readiness::global()).await });
//!
//!     let router = bootwright::probe::router(Readiness::global().clone());
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, router).await?;
//!     # let _ = app;
//!     Ok(())
//! }
//! ```

extern crate self as bootwright;

pub mod common;
pub mod config;
pub mod di;
pub mod error;
pub mod lifecycle;
pub mod probe;

// Re-export core types
pub use common::ApiResponse;
pub use config::{BootstrapOptions, ConfigService};
pub use di::{Container, HasContainer, Inject, Injectable, Resolve, ServiceCollection};
pub use error::{BootwrightError, Result};
pub use lifecycle::{bootstrap, bootstrap_with};

// Re-export macros
pub use bootwright_macro::{Injectable, Injectable as DeriveInjectable, bootstrapper};

// Re-export commonly used types from dependencies
pub use anyhow;
pub use axum;
pub use inventory;

/// Prelude module for convenient imports
///
/// ```
/// use bootwright::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::ApiResponse;
    pub use crate::config::{BootstrapOptions, ConfigService};
    pub use crate::di::{Container, HasContainer, Inject, Injectable, Resolve, ServiceCollection};
    pub use crate::error::{BootwrightError, Result};
    pub use crate::lifecycle::{
        AppBuilder, Application, BackgroundTasks, Discovery, HookContext, HostProfile,
        LifecycleError, LifecycleManager, Phase, Readiness, TimeoutPolicy, bootstrap,
        bootstrap_with, shutdown_signal,
    };
    pub use crate::{DeriveInjectable as Injectable, bootstrapper};
    pub use std::sync::Arc;
}
