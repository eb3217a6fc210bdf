//! Lifecycle Manager
//!
//! Turns discovered bootstrappers into a priority-ordered list and drives them
//! through the startup phases.

use super::aliases::HookAliases;
use super::application::{AppBuilder, Application};
use super::context::HookContext;
use super::discovery::{BootstrapCandidate, Discovery};
use super::drain::BackgroundTasks;
use super::hook::{HookFn, HookMethod};
use super::phase::Phase;
use super::resolver::ResolvedHookSet;
use super::{LifecycleError, Result};
use crate::config::BootstrapOptions;

/// A bootstrapper that passed hook resolution and shape validation.
#[derive(Debug, Clone)]
pub struct RegisteredBootstrapper {
    name: String,
    priority: i32,
    hooks: ResolvedHookSet,
}

impl RegisteredBootstrapper {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn hooks(&self) -> &ResolvedHookSet {
        &self.hooks
    }
}

/// Why a discovered bootstrapper was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// None of its public methods matched any hook alias.
    NoHooks { bootstrapper: String },
    /// A method in an asynchronous slot does not return a future.
    MalformedAsync { bootstrapper: String, method: String },
}

/// Manages the bootstrap lifecycle
///
/// The LifecycleManager is responsible for:
/// - Resolving each candidate's hooks and rejecting malformed candidates
/// - Ordering the survivors by priority
/// - Running the phases, blocking on synchronous hooks and launching
///   asynchronous ones into the background
///
/// # Example
///
/// ```rust,ignore
/// use bootwright::lifecycle::{AppBuilder, Discovery, LifecycleManager, Readiness};
///
/// let mut manager = LifecycleManager::default();
/// manager.register(Discovery::everything().scan());
///
/// let (app, tasks) = manager.bootstrap(AppBuilder::new())?;
/// tokio::spawn(async move { tasks.drain(Readiness::global()).await });
/// // ... serve with `app` ...
/// ```
pub struct LifecycleManager {
    aliases: HookAliases,
    bootstrappers: Vec<RegisteredBootstrapper>,
    rejections: Vec<Rejection>,
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new(&BootstrapOptions::default())
    }
}

impl LifecycleManager {
    /// Create a new LifecycleManager
    pub fn new(options: &BootstrapOptions) -> Self {
        Self {
            aliases: options.hook_aliases(),
            bootstrappers: Vec::new(),
            rejections: Vec::new(),
        }
    }

    /// Manager populated from a discovery scan.
    pub fn discover(options: &BootstrapOptions, discovery: &Discovery) -> Self {
        let mut manager = Self::new(options);
        manager.register(discovery.scan());
        manager
    }

    /// Resolve and validate candidates, keeping the list sorted by priority.
    ///
    /// The sort is stable: equal priorities keep discovery order.
    pub fn register(&mut self, candidates: impl IntoIterator<Item = BootstrapCandidate>) {
        tracing::info!("Loading bootstrappers...");
        for candidate in candidates {
            let name = candidate.full_name();
            tracing::info!("Found bootstrapper: {}.", name);

            let hooks = ResolvedHookSet::resolve(candidate.hooks(), &self.aliases);
            if hooks.is_empty() {
                tracing::warn!(
                    "{}...could not find any public method: {}.",
                    name,
                    self.aliases.all_names().join(", ")
                );
                self.rejections.push(Rejection::NoHooks { bootstrapper: name });
                continue;
            }

            if let Some(method) = hooks.find_malformed_async() {
                tracing::warn!(
                    "{}...found method {} but it is not async.",
                    name,
                    method.name()
                );
                self.rejections.push(Rejection::MalformedAsync {
                    bootstrapper: name,
                    method: method.name().to_string(),
                });
                continue;
            }

            tracing::info!(
                "{}...found methods: {}.",
                name,
                hooks.found_names().join(", ")
            );
            self.bootstrappers.push(RegisteredBootstrapper {
                name,
                priority: candidate.priority(),
                hooks,
            });
        }
        self.bootstrappers.sort_by_key(RegisteredBootstrapper::priority);
    }

    /// Registered bootstrappers in execution order
    pub fn bootstrappers(&self) -> &[RegisteredBootstrapper] {
        &self.bootstrappers
    }

    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    /// Run every phase and build the application.
    ///
    /// Returns the application together with the asynchronous hooks still in flight;
    /// the caller drains them and signals readiness. A failing synchronous hook
    /// aborts the run and drops (aborting) the tasks launched so far.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NoRuntime`] outside a Tokio runtime,
    /// [`LifecycleError::HookFailed`] for the first synchronous hook that fails,
    /// [`LifecycleError::Build`] if the application cannot be built.
    pub fn bootstrap(&self, builder: AppBuilder) -> Result<(Application, BackgroundTasks)> {
        let mut tasks = BackgroundTasks::new()?;

        for phase in Phase::ORDER.into_iter().filter(|phase| phase.is_pre_build()) {
            self.run_phase(phase, &mut tasks, |phase| {
                builder.hook_context(phase).map_err(LifecycleError::from)
            })?;
        }

        tracing::info!("========== [Bootstrapping] Building application...");
        let app = builder.build()?;

        for phase in Phase::ORDER.into_iter().filter(|phase| !phase.is_pre_build()) {
            self.run_phase(phase, &mut tasks, |phase| Ok(app.hook_context(phase)))?;
        }

        tracing::info!(
            "========== [Bootstrapping] Done; {} background tasks in flight",
            tasks.len()
        );
        Ok((app, tasks))
    }

    fn run_phase(
        &self,
        phase: Phase,
        tasks: &mut BackgroundTasks,
        context: impl Fn(Phase) -> Result<HookContext>,
    ) -> Result<()> {
        tracing::info!("========== [Bootstrapping] {}...", phase.banner());

        for bootstrapper in &self.bootstrappers {
            let Some(hook) = bootstrapper.hooks.dispatch(phase) else {
                continue;
            };
            let ctx = context(phase)?;
            self.invoke(bootstrapper, hook, ctx, tasks)?;
        }
        Ok(())
    }

    fn invoke(
        &self,
        bootstrapper: &RegisteredBootstrapper,
        hook: &HookMethod,
        ctx: HookContext,
        tasks: &mut BackgroundTasks,
    ) -> Result<()> {
        match hook.func() {
            HookFn::Deferred(func) => {
                tracing::info!(
                    "[{}] Invoking async method {}.{}...",
                    bootstrapper.priority,
                    bootstrapper.name,
                    hook.name()
                );
                tasks.spawn(format!("{}.{}", bootstrapper.name, hook.name()), func(ctx));
            }
            HookFn::Immediate(func) => {
                tracing::info!(
                    "[{}] Invoking method {}.{}...",
                    bootstrapper.priority,
                    bootstrapper.name,
                    hook.name()
                );
                func(&ctx).map_err(|e| {
                    tracing::error!(
                        "{}.{} failed: {:#}",
                        bootstrapper.name,
                        hook.name(),
                        e
                    );
                    LifecycleError::hook_failed(&bootstrapper.name, hook.name(), e)
                })?;
            }
        }
        Ok(())
    }
}
