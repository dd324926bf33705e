//! Runtime Configuration
//!
//! Knobs that decide how a [`Root`](crate::Root) reacts to misuse: state
//! updates issued while a pass is still rendering, hooks called in a
//! different order between passes, and reference callbacks that panic.
//!
//! A config is normally built in code, but it also deserializes from JSON so
//! an embedding application can ship it next to its other settings:
//!
//! ```rust
//! use sprig_core::{HookOrderPolicy, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_json(r#"{ "hook_order": "warn" }"#).unwrap();
//! assert_eq!(config.hook_order, HookOrderPolicy::Warn);
//! assert_eq!(config.max_nested_passes, 16);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_max_nested_passes() -> usize {
    16
}

fn default_isolate_ref_panics() -> bool {
    true
}

/// What to do when a pass calls a different number of hooks than the last
/// committed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookOrderPolicy {
    /// Abort the pass with [`RenderError::HookCountMismatch`](crate::RenderError).
    #[default]
    Reject,
    /// Log a warning and commit anyway.
    Warn,
}

/// Per-root runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// How many follow-up passes may be drained after a pass during which a
    /// setter fired. `0` rejects every state update made while rendering.
    #[serde(default = "default_max_nested_passes")]
    pub max_nested_passes: usize,

    /// Reaction to a changed hook count between passes.
    pub hook_order: HookOrderPolicy,

    /// Catch panics raised by reference callbacks and log them as warnings.
    #[serde(default = "default_isolate_ref_panics")]
    pub isolate_ref_panics: bool,
}

impl RuntimeConfig {
    /// Parse a config from a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the re-entrant pass limit.
    pub fn with_max_nested_passes(mut self, limit: usize) -> Self {
        self.max_nested_passes = limit;
        self
    }

    /// Set the hook order policy.
    pub fn with_hook_order(mut self, policy: HookOrderPolicy) -> Self {
        self.hook_order = policy;
        self
    }

    /// Enable or disable panic isolation for reference callbacks.
    pub fn with_isolate_ref_panics(mut self, isolate: bool) -> Self {
        self.isolate_ref_panics = isolate;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_nested_passes: default_max_nested_passes(),
            hook_order: HookOrderPolicy::default(),
            isolate_ref_panics: default_isolate_ref_panics(),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = RuntimeConfig::from_json("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.max_nested_passes, 16);
        assert_eq!(config.hook_order, HookOrderPolicy::Reject);
        assert!(config.isolate_ref_panics);
    }

    #[test]
    fn parse_full_document() {
        let json = r#"{
            "max_nested_passes": 0,
            "hook_order": "warn",
            "isolate_ref_panics": false
        }"#;

        let config = RuntimeConfig::from_json(json).unwrap();
        assert_eq!(config.max_nested_passes, 0);
        assert_eq!(config.hook_order, HookOrderPolicy::Warn);
        assert!(!config.isolate_ref_panics);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = RuntimeConfig::from_json(r#"{ "hook_order": "ignore" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid runtime config"));
    }

    #[test]
    fn builder_methods_chain() {
        let config = RuntimeConfig::default()
            .with_max_nested_passes(2)
            .with_hook_order(HookOrderPolicy::Warn)
            .with_isolate_ref_panics(false);

        assert_eq!(config.max_nested_passes, 2);
        assert_eq!(config.hook_order, HookOrderPolicy::Warn);
        assert!(!config.isolate_ref_panics);
    }
}
