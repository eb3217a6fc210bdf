use crate::di::Container;
use crate::error::{BootwrightError, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared, mutable service-registration collection.
///
/// Every bootstrapper that runs before the application is built registers into the
/// same collection, including asynchronous hooks still running in the background.
/// All mutations go through one mutex. Once the application is built the collection
/// is sealed and further registrations fail with [`BootwrightError::BuilderSealed`].
///
/// # Example
/// ```
/// use bootwright::{ServiceCollection, Resolve};
///
/// let services = ServiceCollection::new();
/// services.register(42u32).unwrap();
/// let container = services.seal().unwrap();
/// assert_eq!(*container.resolve::<u32>().unwrap(), 42);
/// assert!(services.register(7u64).is_err());
/// ```
#[derive(Clone)]
pub struct ServiceCollection {
    container: Arc<Mutex<Option<Container>>>,
}

impl ServiceCollection {
    /// Create a new, open collection
    pub fn new() -> Self {
        Self {
            container: Arc::new(Mutex::new(Some(Container::new()))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Container>> {
        self.container.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a service instance
    pub fn register<T: 'static + Send + Sync>(&self, instance: T) -> Result<()> {
        let mut guard = self.lock();
        let container = guard.as_mut().ok_or_else(BootwrightError::sealed::<T>)?;
        container.register(instance);
        Ok(())
    }

    /// Register an already shared instance
    pub fn register_shared<T: 'static + Send + Sync>(&self, instance: Arc<T>) -> Result<()> {
        let mut guard = self.lock();
        let container = guard.as_mut().ok_or_else(BootwrightError::sealed::<T>)?;
        container.register_shared(instance);
        Ok(())
    }

    /// Bind a trait to a concrete implementation
    ///
    /// This enables resolving `Arc<dyn Trait>` to the registered implementation.
    /// The implementation must have been registered first (or will be).
    pub fn bind<Trait, Impl, F>(&self, caster: F) -> Result<()>
    where
        Trait: ?Sized + 'static + Send + Sync,
        Impl: 'static + Send + Sync,
        F: Fn(Arc<Impl>) -> Arc<Trait> + 'static + Send + Sync,
    {
        let mut guard = self.lock();
        let container = guard.as_mut().ok_or_else(BootwrightError::sealed::<Trait>)?;
        container.register_trait::<Trait, Impl, F>(caster);
        Ok(())
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|container| container.contains::<T>())
    }

    pub fn len(&self) -> usize {
        self.lock().as_ref().map_or(0, Container::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_sealed(&self) -> bool {
        self.lock().is_none()
    }

    /// Copy of the registrations made so far, used as the lookup container for hooks
    /// that run before the build.
    pub fn snapshot(&self) -> Result<Container> {
        self.lock()
            .as_ref()
            .cloned()
            .ok_or_else(|| BootwrightError::sealed::<Container>())
    }

    /// Seal the collection and hand out the final container. Can only succeed once.
    pub fn seal(&self) -> Result<Container> {
        self.lock()
            .take()
            .ok_or_else(|| BootwrightError::sealed::<Container>())
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::Resolve;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_clones_share_registrations() {
        let services = ServiceCollection::new();
        let handle = services.clone();
        handle.register(English).unwrap();
        handle
            .bind::<dyn Greeter, English, _>(|e| e as Arc<dyn Greeter>)
            .unwrap();

        assert!(services.contains::<English>());
        assert!(services.contains::<dyn Greeter>());
        assert_eq!(services.len(), 1);
        let greeter = services.snapshot().unwrap().resolve_trait::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greet(), "hello");
    }

    #[test]
    fn test_snapshot_does_not_track_later_registrations() {
        let services = ServiceCollection::new();
        services.register(1u8).unwrap();
        let snapshot = services.snapshot().unwrap();
        services.register(2u16).unwrap();

        assert!(snapshot.resolve::<u8>().is_ok());
        assert!(snapshot.resolve::<u16>().is_err());
    }

    #[test]
    fn test_sealed_collection_rejects_mutation() {
        let services = ServiceCollection::new();
        services.register(English).unwrap();
        let container = services.seal().unwrap();

        assert!(services.is_sealed());
        assert_eq!(services.len(), 0);
        assert!(container.resolve_trait::<dyn Greeter>().is_err());
        assert!(matches!(
            services.register(5u32),
            Err(BootwrightError::BuilderSealed { .. })
        ));
        assert!(services.seal().is_err());
        assert!(services.snapshot().is_err());
    }
}
