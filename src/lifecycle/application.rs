//! Host collaborators handed to hooks
//!
//! [`AppBuilder`] is the mutable side used by the configure phases; building it
//! seals the service collection and yields the immutable [`Application`] that the
//! initialize and decorate phases see.

use super::context::HookContext;
use super::phase::Phase;
use crate::config::ConfigService;
use crate::di::{Container, HasContainer, Resolve, ServiceCollection};
use crate::error::Result;
use std::sync::Arc;

/// Builder for an [`Application`]
///
/// Cloning yields another handle onto the same configuration and service collection.
///
/// # Example
///
/// ```rust
/// use bootwright::lifecycle::AppBuilder;
/// use bootwright::{ConfigService, Resolve};
///
/// let builder = AppBuilder::with_config(ConfigService::from_pairs([("ENV", "test")]));
/// builder.services().register(3u8).unwrap();
/// let app = builder.build().unwrap();
/// assert_eq!(*app.resolve::<u8>().unwrap(), 3);
/// assert_eq!(app.config().get("ENV").as_deref(), Some("test"));
/// ```
#[derive(Clone)]
pub struct AppBuilder {
    config: ConfigService,
    services: ServiceCollection,
}

impl AppBuilder {
    /// Builder whose configuration is seeded from the process environment
    pub fn new() -> Self {
        Self::with_config(ConfigService::new())
    }

    pub fn with_config(config: ConfigService) -> Self {
        let services = ServiceCollection::new();
        // A fresh collection is never sealed.
        let _ = services.register(config.clone());
        Self { config, services }
    }

    pub fn config(&self) -> &ConfigService {
        &self.config
    }

    pub fn services(&self) -> &ServiceCollection {
        &self.services
    }

    /// Context for a hook running before the build.
    ///
    /// The lookup container is a snapshot of what has been registered so far.
    pub(crate) fn hook_context(&self, phase: Phase) -> Result<HookContext> {
        let snapshot = self.services.snapshot()?;
        Ok(HookContext::new(phase, Arc::new(snapshot))
            .with_ambient(Arc::new(self.clone()))
            .with_ambient(Arc::new(self.services.clone())))
    }

    /// Seal the service collection and produce the running application.
    pub fn build(self) -> Result<Application> {
        let container = self.services.seal()?;
        tracing::debug!("Sealed service collection ({} services)", container.len());
        Ok(Application {
            container: Arc::new(container),
            config: self.config,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The built application: an immutable container plus configuration.
#[derive(Clone)]
pub struct Application {
    container: Arc<Container>,
    config: ConfigService,
}

impl Application {
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    pub fn config(&self) -> &ConfigService {
        &self.config
    }

    /// Context for a hook running after the build.
    pub(crate) fn hook_context(&self, phase: Phase) -> HookContext {
        HookContext::new(phase, Arc::clone(&self.container))
            .with_ambient(Arc::new(self.clone()))
            .with_ambient(Arc::clone(&self.container))
    }
}

impl Resolve for Application {
    fn resolve<T: 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        self.container.resolve::<T>()
    }

    fn resolve_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        self.container.resolve_trait::<T>()
    }
}

impl HasContainer for Application {
    fn get_container(&self) -> &Container {
        &self.container
    }
}
