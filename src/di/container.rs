use crate::error::{BootwrightError, Result};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Type alias for a function that can cast an `Arc<dyn Any>` to another `Arc<dyn Any>`.
/// The inner value is usually an `Arc<dyn Trait>`.
type CasterFn =
    Arc<dyn Fn(Arc<dyn Any + Send + Sync>) -> Option<Arc<dyn Any + Send + Sync>> + Send + Sync>;

/// Anything services can be looked up from.
///
/// Implemented by [`Container`] and by the per-invocation
/// [`HookContext`](crate::lifecycle::HookContext), which layers the phase's ambient
/// objects in front of a container.
pub trait Resolve {
    fn resolve<T: 'static + Send + Sync>(&self) -> Result<Arc<T>>;

    fn resolve_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Result<Arc<T>>;
}

/// Thread-safe dependency injection container.
pub struct Container {
    services: DashMap<TypeId, ServiceEntry>,
    trait_mappings: DashMap<TypeId, TypeId>,
    casters: DashMap<TypeId, CasterFn>,
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            services: self.services.clone(),
            trait_mappings: self.trait_mappings.clone(),
            casters: self.casters.clone(),
        }
    }
}

#[derive(Clone)]
struct ServiceEntry {
    instance: Arc<dyn Any + Send + Sync>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
            trait_mappings: DashMap::new(),
            casters: DashMap::new(),
        }
    }

    pub fn register<T: 'static + Send + Sync>(&mut self, instance: T) -> &mut Self {
        self.register_shared(Arc::new(instance))
    }

    /// Register an already shared instance without re-wrapping it.
    pub fn register_shared<T: 'static + Send + Sync>(&mut self, instance: Arc<T>) -> &mut Self {
        let type_id = TypeId::of::<T>();
        self.services.insert(type_id, ServiceEntry { instance });
        self
    }

    pub fn register_trait<Trait, Impl, F>(&mut self, caster_fn: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        Impl: 'static + Send + Sync,
        F: Fn(Arc<Impl>) -> Arc<Trait> + 'static + Send + Sync,
    {
        let trait_id = TypeId::of::<Trait>();
        let impl_id = TypeId::of::<Impl>();

        self.trait_mappings.insert(trait_id, impl_id);

        let caster: CasterFn = Arc::new(move |instance: Arc<dyn Any + Send + Sync>| {
            let concrete = instance.downcast::<Impl>().ok()?;
            let trait_obj: Arc<Trait> = caster_fn(concrete);
            Some(Arc::new(trait_obj) as Arc<dyn Any + Send + Sync>)
        });

        self.casters.insert(trait_id, caster);
        self
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        let type_id = TypeId::of::<T>();
        self.services.contains_key(&type_id) || self.trait_mappings.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Resolve for Container {
    fn resolve<T: 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let requested_type_id = TypeId::of::<T>();
        let entry = self
            .services
            .get(&requested_type_id)
            .ok_or_else(BootwrightError::not_found::<T>)?;
        entry
            .instance
            .clone()
            .downcast::<T>()
            .map_err(|_| BootwrightError::DowncastFailed {
                type_name: std::any::type_name::<T>().to_string(),
            })
    }

    fn resolve_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let requested_type_id = TypeId::of::<T>();

        let caster = self
            .casters
            .get(&requested_type_id)
            .ok_or_else(BootwrightError::not_found::<T>)?;

        let impl_type_id = self.trait_mappings.get(&requested_type_id).ok_or_else(|| {
            BootwrightError::DependencyNotFound {
                type_name: format!(
                    "No implementation mapping found for trait '{}'",
                    std::any::type_name::<T>()
                ),
            }
        })?;

        let entry = self.services.get(&*impl_type_id).ok_or_else(|| {
            BootwrightError::DependencyNotFound {
                type_name: format!(
                    "Implementation for trait '{}' not registered",
                    std::any::type_name::<T>()
                ),
            }
        })?;

        // The caster hands back an Arc<dyn Any> wrapping the Arc<T>.
        let wrapper = (caster.value())(entry.instance.clone())
            .and_then(|cast| cast.downcast::<Arc<T>>().ok())
            .ok_or_else(|| BootwrightError::DowncastFailed {
                type_name: std::any::type_name::<T>().to_string(),
            })?;
        Ok(wrapper.as_ref().clone())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}
