//! Bootstrapper discovery
//!
//! Bootstrappers register themselves at compile time: `#[bootstrapper]` implements
//! [`Bootstrap`] for the annotated type and submits a [`BootstrapperEntry`] to the
//! link-time registry. There is no manual registration list.

use super::hook::HookTable;
use std::borrow::Cow;
use std::collections::HashSet;

/// Priority used when the marker does not set one. Lower runs earlier.
pub const DEFAULT_PRIORITY: i32 = 1000;

/// Implemented by `#[bootstrapper]` for the annotated type.
pub trait Bootstrap {
    const NAME: &'static str;
    const MODULE_PATH: &'static str;
    const PRIORITY: i32 = DEFAULT_PRIORITY;

    fn hook_table() -> HookTable;
}

/// Link-time registry entry emitted by `#[bootstrapper]`.
pub struct BootstrapperEntry {
    pub name: &'static str,
    pub module_path: &'static str,
    pub priority: i32,
    pub hooks: fn() -> HookTable,
}

impl BootstrapperEntry {
    pub const fn of<T: Bootstrap>() -> Self {
        Self {
            name: T::NAME,
            module_path: T::MODULE_PATH,
            priority: T::PRIORITY,
            hooks: T::hook_table,
        }
    }

    fn is_under(&self, prefix: &str) -> bool {
        self.module_path == prefix
            || self
                .module_path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

inventory::collect!(BootstrapperEntry);

/// A discovered bootstrapper, not yet checked for hooks.
#[derive(Debug, Clone)]
pub struct BootstrapCandidate {
    name: Cow<'static, str>,
    module_path: Cow<'static, str>,
    priority: i32,
    hooks: HookTable,
}

impl BootstrapCandidate {
    pub fn new(name: impl Into<Cow<'static, str>>, hooks: HookTable) -> Self {
        Self {
            name: name.into(),
            module_path: Cow::Borrowed(""),
            priority: DEFAULT_PRIORITY,
            hooks,
        }
    }

    pub fn of<T: Bootstrap>() -> Self {
        Self::from_entry(&BootstrapperEntry::of::<T>())
    }

    pub fn from_entry(entry: &BootstrapperEntry) -> Self {
        Self {
            name: Cow::Borrowed(entry.name),
            module_path: Cow::Borrowed(entry.module_path),
            priority: entry.priority,
            hooks: (entry.hooks)(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `module_path::Name`, or just the name for hand-built candidates.
    pub fn full_name(&self) -> String {
        if self.module_path.is_empty() {
            self.name.to_string()
        } else {
            format!("{}::{}", self.module_path, self.name)
        }
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }
}

/// Which bootstrappers to consider.
#[derive(Debug, Clone, Default)]
pub enum Discovery {
    /// Every bootstrapper linked into the process.
    #[default]
    Everything,
    /// Bootstrappers declared in these modules or crates, or nested below them.
    Modules(Vec<String>),
    /// Exactly these candidates, in this order.
    Candidates(Vec<BootstrapCandidate>),
}

impl Discovery {
    pub fn everything() -> Self {
        Self::Everything
    }

    pub fn modules<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let prefixes = prefixes
            .into_iter()
            .map(Into::into)
            .filter(|prefix| seen.insert(prefix.clone()))
            .collect();
        Self::Modules(prefixes)
    }

    pub fn candidates(candidates: impl IntoIterator<Item = BootstrapCandidate>) -> Self {
        Self::Candidates(candidates.into_iter().collect())
    }

    /// Candidates in discovery order.
    ///
    /// Registry entries come back sorted by module path then name, so the order does
    /// not depend on link order.
    pub fn scan(&self) -> Vec<BootstrapCandidate> {
        match self {
            Discovery::Everything => Self::registered(|_| true),
            Discovery::Modules(prefixes) => {
                Self::registered(|entry| prefixes.iter().any(|prefix| entry.is_under(prefix)))
            }
            Discovery::Candidates(candidates) => candidates.clone(),
        }
    }

    fn registered(filter: impl Fn(&BootstrapperEntry) -> bool) -> Vec<BootstrapCandidate> {
        let mut entries: Vec<&BootstrapperEntry> = inventory::iter::<BootstrapperEntry>
            .into_iter()
            .filter(|entry| filter(entry))
            .collect();
        entries.sort_by(|a, b| (a.module_path, a.name).cmp(&(b.module_path, b.name)));
        entries.dedup_by(|a, b| a.module_path == b.module_path && a.name == b.name);
        entries
            .into_iter()
            .map(BootstrapCandidate::from_entry)
            .collect()
    }
}
