//! Accepted hook names per slot

use super::phase::{HookSlot, Phase};
use std::borrow::Cow;
use strum_macros::{Display, EnumString};

/// Which host the alias table is tailored for.
///
/// Browser hosts name their builder and decorate hooks after the wasm builder
/// (`configure_wasm_builder`, `decorate_wasm_app`); everything else is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HostProfile {
    #[default]
    Web,
    Wasm,
}

const CONFIGURE_SERVICES: &[&str] = &[
    "configure_services",
    "configures_services",
    "configure_service",
    "configures_service",
];
const CONFIGURE_BUILDER: &[&str] = &["configure_builder", "configures_builder"];
const CONFIGURE_WASM_BUILDER: &[&str] = &["configure_wasm_builder", "configures_wasm_builder"];
const INITIALIZE_SERVICES: &[&str] = &[
    "initialize_services",
    "initializes_services",
    "initialize_service",
    "initializes_service",
];
const DECORATE_APP: &[&str] = &[
    "decorate_app",
    "decorates_app",
    "decorate_application",
    "decorates_application",
];
const DECORATE_WASM_APP: &[&str] = &[
    "decorate_wasm_app",
    "decorates_wasm_app",
    "decorate_wasm_application",
    "decorates_wasm_application",
];

const ASYNC_SUFFIX: &str = "_async";

/// Synonymous method names accepted for each of the eight hook slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookAliases {
    slots: [Vec<Cow<'static, str>>; 8],
}

impl HookAliases {
    pub fn web() -> Self {
        Self::from_bases(CONFIGURE_BUILDER, DECORATE_APP)
    }

    pub fn wasm() -> Self {
        Self::from_bases(CONFIGURE_WASM_BUILDER, DECORATE_WASM_APP)
    }

    pub fn for_profile(profile: HostProfile) -> Self {
        match profile {
            HostProfile::Web => Self::web(),
            HostProfile::Wasm => Self::wasm(),
        }
    }

    fn from_bases(builder: &[&'static str], decorate: &[&'static str]) -> Self {
        let mut slots: [Vec<Cow<'static, str>>; 8] = Default::default();
        for slot in HookSlot::ALL {
            let bases = match slot.phase {
                Phase::ConfigureServices => CONFIGURE_SERVICES,
                Phase::ConfigureBuilder => builder,
                Phase::InitializeServices => INITIALIZE_SERVICES,
                Phase::DecorateApp => decorate,
            };
            slots[slot.index()] = bases
                .iter()
                .map(|base| {
                    if slot.is_async() {
                        Cow::Owned(format!("{}{}", base, ASYNC_SUFFIX))
                    } else {
                        Cow::Borrowed(*base)
                    }
                })
                .collect();
        }
        Self { slots }
    }

    /// Replace the accepted names for one slot.
    pub fn with_slot<I, S>(mut self, slot: HookSlot, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        self.slots[slot.index()] = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn names(&self, slot: HookSlot) -> &[Cow<'static, str>] {
        &self.slots[slot.index()]
    }

    pub fn matches(&self, slot: HookSlot, name: &str) -> bool {
        self.names(slot).iter().any(|alias| alias == name)
    }

    /// Every accepted name, slot by slot; used when a bootstrapper matches none.
    pub fn all_names(&self) -> Vec<&str> {
        self.slots
            .iter()
            .flat_map(|names| names.iter().map(AsRef::as_ref))
            .collect()
    }
}

impl Default for HookAliases {
    fn default() -> Self {
        Self::web()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_aliases_include_spelling_variants() {
        let aliases = HookAliases::web();
        let slot = HookSlot::synchronous(Phase::ConfigureServices);
        assert!(aliases.matches(slot, "configures_service"));
        assert!(!aliases.matches(slot, "configure_services_async"));

        let slot = HookSlot::asynchronous(Phase::DecorateApp);
        assert!(aliases.matches(slot, "decorates_application_async"));
        assert!(!aliases.matches(slot, "decorate_app"));
    }

    #[test]
    fn test_wasm_profile_renames_builder_and_decorate() {
        let aliases = HookAliases::wasm();
        let builder = HookSlot::synchronous(Phase::ConfigureBuilder);
        assert!(aliases.matches(builder, "configure_wasm_builder"));
        assert!(!aliases.matches(builder, "configure_builder"));
        assert!(aliases.matches(
            HookSlot::asynchronous(Phase::DecorateApp),
            "decorate_wasm_app_async"
        ));
        assert!(aliases.matches(
            HookSlot::synchronous(Phase::InitializeServices),
            "initialize_services"
        ));
    }

    #[test]
    fn test_slot_override() {
        let slot = HookSlot::synchronous(Phase::ConfigureBuilder);
        let aliases = HookAliases::web().with_slot(slot, ["setup"]);
        assert!(aliases.matches(slot, "setup"));
        assert!(!aliases.matches(slot, "configure_builder"));
        assert_eq!(aliases.all_names().len(), 4 + 4 + 1 + 2 + 4 + 4 + 4 + 4);
    }

    #[test]
    fn test_profile_parses_case_insensitively() {
        assert_eq!("WASM".parse::<HostProfile>().unwrap(), HostProfile::Wasm);
        assert_eq!(HostProfile::Web.to_string(), "web");
        assert!("desktop".parse::<HostProfile>().is_err());
    }
}
