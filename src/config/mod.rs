use crate::error::{BootwrightError, Result};
use crate::lifecycle::{HookAliases, HostProfile, TimeoutPolicy};
use dashmap::DashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub const KEY_HOST_PROFILE: &str = "BOOTWRIGHT_HOST_PROFILE";
pub const KEY_DRAIN_TIMEOUT_MS: &str = "BOOTWRIGHT_DRAIN_TIMEOUT_MS";
pub const KEY_TIMEOUT_POLICY: &str = "BOOTWRIGHT_TIMEOUT_POLICY";

/// Configuration service
///
/// Cheap to clone; every clone reads and writes the same key space. An instance is
/// registered into each [`AppBuilder`](crate::lifecycle::AppBuilder), so hooks can
/// declare a `ConfigService` parameter.
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Seeded from the process environment.
    pub fn new() -> Self {
        Self::from_pairs(env::vars())
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let service = Self::default();
        for (key, value) in pairs {
            service.config.insert(key.into(), value.into());
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Parse a key's value, `Ok(None)` when the key is absent or blank.
    pub fn parse<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<T>()
            .map(Some)
            .map_err(|e| BootwrightError::InvalidConfig {
                key: key.to_string(),
                message: format!("'{}': {}", raw, e),
            })
    }
}

/// Knobs for a bootstrap run.
///
/// Defaults reproduce the plain behavior: web alias table, no drain timeout.
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    pub profile: HostProfile,
    pub aliases: Option<HookAliases>,
    pub drain_timeout: Option<Duration>,
    pub timeout_policy: TimeoutPolicy,
}

impl BootstrapOptions {
    pub fn from_config(config: &ConfigService) -> Result<Self> {
        Ok(Self {
            profile: config.parse(KEY_HOST_PROFILE)?.unwrap_or_default(),
            aliases: None,
            drain_timeout: config
                .parse::<u64>(KEY_DRAIN_TIMEOUT_MS)?
                .map(Duration::from_millis),
            timeout_policy: config.parse(KEY_TIMEOUT_POLICY)?.unwrap_or_default(),
        })
    }

    pub fn with_profile(mut self, profile: HostProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Replace the profile's alias table outright.
    pub fn with_aliases(mut self, aliases: HookAliases) -> Self {
        self.aliases = Some(aliases);
        self
    }

    pub fn with_drain_timeout(mut self, timeout: Duration, policy: TimeoutPolicy) -> Self {
        self.drain_timeout = Some(timeout);
        self.timeout_policy = policy;
        self
    }

    /// The alias table in effect.
    pub fn hook_aliases(&self) -> HookAliases {
        self.aliases
            .clone()
            .unwrap_or_else(|| HookAliases::for_profile(self.profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default_without_keys() {
        let options = BootstrapOptions::from_config(&ConfigService::default()).unwrap();
        assert_eq!(options.profile, HostProfile::Web);
        assert_eq!(options.drain_timeout, None);
        assert_eq!(options.timeout_policy, TimeoutPolicy::Warn);
    }

    #[test]
    fn test_options_from_config_keys() {
        let config = ConfigService::from_pairs([
            (KEY_HOST_PROFILE, "wasm"),
            (KEY_DRAIN_TIMEOUT_MS, "2500"),
            (KEY_TIMEOUT_POLICY, "fatal"),
        ]);
        let options = BootstrapOptions::from_config(&config).unwrap();
        assert_eq!(options.profile, HostProfile::Wasm);
        assert_eq!(options.drain_timeout, Some(Duration::from_millis(2500)));
        assert_eq!(options.timeout_policy, TimeoutPolicy::Fatal);
    }

    #[test]
    fn test_invalid_value_names_the_key() {
        let config = ConfigService::from_pairs([(KEY_DRAIN_TIMEOUT_MS, "soon")]);
        let err = BootstrapOptions::from_config(&config).unwrap_err();
        assert!(err.to_string().contains(KEY_DRAIN_TIMEOUT_MS));
    }

    #[test]
    fn test_clones_share_values() {
        let config = ConfigService::default();
        config.clone().set("Keys:RSAPFXFile", "/tmp/key.pfx");
        assert_eq!(config.get("Keys:RSAPFXFile").as_deref(), Some("/tmp/key.pfx"));
    }
}
