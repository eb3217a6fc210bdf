//! Hook phases and slots

use strum_macros::Display;

/// A module-visible startup phase.
///
/// The build step sits between [`Phase::ConfigureBuilder`] and
/// [`Phase::InitializeServices`]; it is owned by the host and has no hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Phase {
    ConfigureServices,
    ConfigureBuilder,
    InitializeServices,
    DecorateApp,
}

impl Phase {
    /// Phases in execution order.
    pub const ORDER: [Phase; 4] = [
        Phase::ConfigureServices,
        Phase::ConfigureBuilder,
        Phase::InitializeServices,
        Phase::DecorateApp,
    ];

    /// Whether the phase runs before the application is built.
    pub fn is_pre_build(self) -> bool {
        matches!(self, Phase::ConfigureServices | Phase::ConfigureBuilder)
    }

    pub(crate) fn banner(self) -> &'static str {
        match self {
            Phase::ConfigureServices => "Configuring services",
            Phase::ConfigureBuilder => "Configuring builder",
            Phase::InitializeServices => "Initializing services",
            Phase::DecorateApp => "Decorating application",
        }
    }

    const fn index(self) -> usize {
        match self {
            Phase::ConfigureServices => 0,
            Phase::ConfigureBuilder => 1,
            Phase::InitializeServices => 2,
            Phase::DecorateApp => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum HookVariant {
    Sync,
    Async,
}

/// One of the eight (phase, variant) hook positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookSlot {
    pub phase: Phase,
    pub variant: HookVariant,
}

impl HookSlot {
    pub const ALL: [HookSlot; 8] = [
        HookSlot::asynchronous(Phase::ConfigureServices),
        HookSlot::synchronous(Phase::ConfigureServices),
        HookSlot::asynchronous(Phase::ConfigureBuilder),
        HookSlot::synchronous(Phase::ConfigureBuilder),
        HookSlot::asynchronous(Phase::InitializeServices),
        HookSlot::synchronous(Phase::InitializeServices),
        HookSlot::asynchronous(Phase::DecorateApp),
        HookSlot::synchronous(Phase::DecorateApp),
    ];

    pub const fn synchronous(phase: Phase) -> Self {
        Self {
            phase,
            variant: HookVariant::Sync,
        }
    }

    pub const fn asynchronous(phase: Phase) -> Self {
        Self {
            phase,
            variant: HookVariant::Async,
        }
    }

    pub fn is_async(self) -> bool {
        self.variant == HookVariant::Async
    }

    /// Position in [`HookSlot::ALL`].
    pub(crate) const fn index(self) -> usize {
        let offset = match self.variant {
            HookVariant::Async => 0,
            HookVariant::Sync => 1,
        };
        self.phase.index() * 2 + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_index_matches_all_order() {
        for (i, slot) in HookSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }

    #[test]
    fn test_build_splits_the_phase_order() {
        let pre: Vec<Phase> = Phase::ORDER.into_iter().filter(|p| p.is_pre_build()).collect();
        assert_eq!(pre, [Phase::ConfigureServices, Phase::ConfigureBuilder]);
        assert_eq!(Phase::DecorateApp.to_string(), "DecorateApp");
        assert!(Phase::ConfigureBuilder.is_pre_build());
        assert!(!Phase::InitializeServices.is_pre_build());
    }
}
