//! Argument resolution for hook invocations

use super::phase::Phase;
use crate::di::{Container, Resolve};
use crate::error::Result;
use std::any::Any;
use std::sync::Arc;

type Ambient = Arc<dyn Any + Send + Sync>;

/// Everything a single hook invocation can draw its arguments from.
///
/// Parameters are resolved against the phase's ambient objects first (the
/// [`AppBuilder`](super::AppBuilder) and its [`ServiceCollection`](crate::ServiceCollection)
/// before the build, the [`Application`](super::Application) and its [`Container`]
/// after it), then against the lookup container. Cloning is cheap.
#[derive(Clone)]
pub struct HookContext {
    phase: Phase,
    ambient: Arc<[Ambient]>,
    container: Arc<Container>,
}

impl HookContext {
    pub fn new(phase: Phase, container: Arc<Container>) -> Self {
        Self {
            phase,
            ambient: Arc::from(Vec::new()),
            container,
        }
    }

    /// Add an ambient object. Ambient objects shadow container entries of the same type.
    pub fn with_ambient<T: 'static + Send + Sync>(mut self, value: Arc<T>) -> Self {
        let mut ambient: Vec<Ambient> = self.ambient.iter().cloned().collect();
        ambient.push(value);
        self.ambient = Arc::from(ambient);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The lookup container behind the ambient objects.
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    fn ambient<T: 'static + Send + Sync>(&self) -> Option<Arc<T>> {
        self.ambient
            .iter()
            .find_map(|value| value.clone().downcast::<T>().ok())
    }
}

impl Resolve for HookContext {
    fn resolve<T: 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        match self.ambient::<T>() {
            Some(value) => Ok(value),
            None => self.container.resolve::<T>(),
        }
    }

    fn resolve_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        self.container.resolve_trait::<T>()
    }
}
