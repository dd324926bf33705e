//! Error Types
//!
//! Sprig keeps its failure surface small. Binder problems are coerced away,
//! reference callback failures are logged, and a missing root binding is a
//! silent no-op. What is left is a render pass that cannot be committed
//! safely, plus configuration that cannot be parsed.

use thiserror::Error;

/// Error returned by a fallible reference callback.
///
/// Callback errors never escape the materializer; they are reported as
/// warnings and the render continues.
pub type CallbackError = Box<dyn std::error::Error + 'static>;

/// Result alias used throughout the runtime.
pub type Result<T, E = RenderError> = std::result::Result<T, E>;

/// A render pass that was aborted before commit.
///
/// When a pass fails, the container keeps whatever tree the last successful
/// pass committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A hook slot was read as a different type than it was seeded with.
    ///
    /// This almost always means a component called its hooks conditionally,
    /// so positions shifted between passes.
    #[error(
        "hook #{index} was read as `{requested}` but holds `{stored}`; \
         hooks must be called in the same order on every render"
    )]
    HookTypeMismatch {
        /// Position of the offending hook in the pass.
        index: usize,
        /// Type requested by the `use_state` call.
        requested: &'static str,
        /// Type the slot was originally seeded with.
        stored: &'static str,
    },

    /// A pass called a different number of hooks than the previous one.
    #[error("render pass called {found} hooks, previous pass called {expected}")]
    HookCountMismatch {
        /// Hook count of the last committed pass.
        expected: usize,
        /// Hook count of the rejected pass.
        found: usize,
    },

    /// State updates issued while rendering kept re-triggering passes.
    #[error("state updates during rendering re-triggered the root more than {limit} times")]
    NestedRenderLimit {
        /// Configured `max_nested_passes`.
        limit: usize,
    },
}

/// Failure to load a [`RuntimeConfig`](crate::RuntimeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document did not match the config schema.
    #[error("invalid runtime config: {0}")]
    Parse(#[from] serde_json::Error),
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_hook() {
        let err = RenderError::HookTypeMismatch {
            index: 2,
            requested: "i32",
            stored: "alloc::string::String",
        };
        let msg = err.to_string();
        assert!(msg.contains("hook #2"));
        assert!(msg.contains("`i32`"));
    }

    #[test]
    fn count_mismatch_message() {
        let err = RenderError::HookCountMismatch { expected: 3, found: 1 };
        assert_eq!(
            err.to_string(),
            "render pass called 1 hooks, previous pass called 3"
        );
    }
}
