//! Hook callables exposed by bootstrappers

use super::context::HookContext;
use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Error produced by a hook body.
pub type HookError = anyhow::Error;

/// The deferred result of an asynchronous hook.
pub type HookFuture = Pin<Box<dyn Future<Output = Result<(), HookError>> + Send + 'static>>;

type ImmediateFn = dyn Fn(&HookContext) -> Result<(), HookError> + Send + Sync;
type DeferredFn = dyn Fn(HookContext) -> HookFuture + Send + Sync;

/// Normalises what a hook body returns.
///
/// Hooks may return nothing or any `Result<(), E>` whose error converts into
/// [`HookError`].
pub trait IntoHookResult {
    fn into_hook_result(self) -> Result<(), HookError>;
}

impl IntoHookResult for () {
    fn into_hook_result(self) -> Result<(), HookError> {
        Ok(())
    }
}

impl<E> IntoHookResult for Result<(), E>
where
    E: Into<HookError>,
{
    fn into_hook_result(self) -> Result<(), HookError> {
        self.map_err(Into::into)
    }
}

/// Return shape of a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookShape {
    /// Runs to completion when called.
    Immediate,
    /// Returns a future that completes later.
    Deferred,
}

#[derive(Clone)]
pub enum HookFn {
    Immediate(Arc<ImmediateFn>),
    Deferred(Arc<DeferredFn>),
}

/// A named, callable hook.
#[derive(Clone)]
pub struct HookMethod {
    name: Cow<'static, str>,
    func: HookFn,
}

impl HookMethod {
    pub fn immediate<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&HookContext) -> Result<(), HookError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: HookFn::Immediate(Arc::new(func)),
        }
    }

    pub fn deferred<F, Fut>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            func: HookFn::Deferred(Arc::new(move |ctx| Box::pin(func(ctx)) as HookFuture)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> HookShape {
        match self.func {
            HookFn::Immediate(_) => HookShape::Immediate,
            HookFn::Deferred(_) => HookShape::Deferred,
        }
    }

    pub fn func(&self) -> &HookFn {
        &self.func
    }
}

impl fmt::Debug for HookMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookMethod")
            .field("name", &self.name)
            .field("shape", &self.shape())
            .finish()
    }
}

/// The public methods a bootstrapper exposes, in declaration order.
///
/// Generated by `#[bootstrapper]`, or assembled by hand:
///
/// ```
/// use bootwright::lifecycle::{HookTable, HookContext};
///
/// let table = HookTable::new()
///     .immediate("configure_services", |_ctx: &HookContext| Ok(()))
///     .deferred("initialize_services_async", |_ctx: HookContext| async { Ok(()) });
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HookTable {
    methods: Vec<HookMethod>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, method: HookMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn immediate<F>(self, name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&HookContext) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.with(HookMethod::immediate(name, func))
    }

    pub fn deferred<F, Fut>(self, name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.with(HookMethod::deferred(name, func))
    }

    pub fn methods(&self) -> &[HookMethod] {
        &self.methods
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
