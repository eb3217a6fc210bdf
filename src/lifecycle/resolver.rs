//! Maps a bootstrapper's methods onto the eight hook slots

use super::aliases::HookAliases;
use super::hook::{HookMethod, HookShape, HookTable};
use super::phase::{HookSlot, Phase};

/// At most one method per hook slot.
#[derive(Debug, Clone, Default)]
pub struct ResolvedHookSet {
    slots: [Option<HookMethod>; 8],
}

impl ResolvedHookSet {
    /// For every slot, pick the first declared method whose name is one of the
    /// slot's aliases. Slots without a match stay empty.
    pub fn resolve(table: &HookTable, aliases: &HookAliases) -> Self {
        let mut set = Self::default();
        for slot in HookSlot::ALL {
            set.slots[slot.index()] = table
                .methods()
                .iter()
                .find(|method| aliases.matches(slot, method.name()))
                .cloned();
        }
        set
    }

    pub fn get(&self, slot: HookSlot) -> Option<&HookMethod> {
        self.slots[slot.index()].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// The hook to invoke for a phase: the asynchronous one when resolved, the
    /// synchronous one otherwise.
    pub fn dispatch(&self, phase: Phase) -> Option<&HookMethod> {
        self.get(HookSlot::asynchronous(phase))
            .or_else(|| self.get(HookSlot::synchronous(phase)))
    }

    /// The first method sitting in an asynchronous slot without a deferred shape.
    pub fn find_malformed_async(&self) -> Option<&HookMethod> {
        Phase::ORDER
            .iter()
            .filter_map(|phase| self.get(HookSlot::asynchronous(*phase)))
            .find(|method| method.shape() != HookShape::Deferred)
    }

    /// Names of the resolved methods, in slot order.
    pub fn found_names(&self) -> Vec<&str> {
        self.slots.iter().flatten().map(HookMethod::name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_table(names: &[&'static str]) -> HookTable {
        names
            .iter()
            .fold(HookTable::new(), |table, name| table.immediate(*name, |_| Ok(())))
    }

    #[test]
    fn test_resolves_aliases_per_slot() {
        let table = noop_table(&["configures_service", "decorate_application", "helper"]);
        let set = ResolvedHookSet::resolve(&table, &HookAliases::web());

        let cs = set.get(HookSlot::synchronous(Phase::ConfigureServices)).unwrap();
        assert_eq!(cs.name(), "configures_service");
        let da = set.get(HookSlot::synchronous(Phase::DecorateApp)).unwrap();
        assert_eq!(da.name(), "decorate_application");
        assert!(set.get(HookSlot::synchronous(Phase::ConfigureBuilder)).is_none());
        assert_eq!(set.found_names(), ["configures_service", "decorate_application"]);
    }

    #[test]
    fn test_first_declared_alias_wins() {
        let table = noop_table(&["configure_service", "configure_services"]);
        let set = ResolvedHookSet::resolve(&table, &HookAliases::web());
        let cs = set.get(HookSlot::synchronous(Phase::ConfigureServices)).unwrap();
        assert_eq!(cs.name(), "configure_service");
    }

    #[test]
    fn test_no_matching_methods_is_empty() {
        let table = noop_table(&["start", "configure"]);
        let set = ResolvedHookSet::resolve(&table, &HookAliases::web());
        assert!(set.is_empty());
        assert!(set.dispatch(Phase::ConfigureServices).is_none());
    }

    #[test]
    fn test_dispatch_prefers_async() {
        let table = HookTable::new()
            .immediate("initialize_services", |_| Ok(()))
            .deferred("initialize_services_async", |_| async { Ok(()) });
        let set = ResolvedHookSet::resolve(&table, &HookAliases::web());
        let hook = set.dispatch(Phase::InitializeServices).unwrap();
        assert_eq!(hook.name(), "initialize_services_async");
        assert_eq!(set.found_names().len(), 2);
    }

    #[test]
    fn test_malformed_async_reports_first_offender() {
        let table = HookTable::new()
            .deferred("configure_services_async", |_| async { Ok(()) })
            .immediate("decorate_app_async", |_| Ok(()))
            .immediate("configure_builder_async", |_| Ok(()));
        let set = ResolvedHookSet::resolve(&table, &HookAliases::web());
        let bad = set.find_malformed_async().unwrap();
        assert_eq!(bad.name(), "configure_builder_async");
    }

    #[test]
    fn test_deferred_in_sync_slot_is_not_malformed() {
        let table = HookTable::new().deferred("configure_services", |_| async { Ok(()) });
        let set = ResolvedHookSet::resolve(&table, &HookAliases::web());
        assert!(set.find_malformed_async().is_none());
    }
}
