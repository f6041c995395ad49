//! Error and failure taxonomy shared by every search driver.
//!
//! `PreconditionViolation` and `InvalidConfiguration` are programming or input
//! errors. The remaining variants are ordinary search outcomes: they end one
//! branch (backtracking) or one run (frontier drivers) and are reported to the
//! caller as structured results.

use thiserror::Error;

/// Errors and unsuccessful outcomes produced by states, rules and drivers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A rule was applied to a state that does not satisfy its precondition.
    #[error("rule `{rule}` is not applicable to state `{state}`")]
    PreconditionViolation { rule: String, state: String },

    /// An initial configuration string or option value could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The current state already appears on the path from the root.
    #[error("state cycle detected on the current path")]
    CycleDetected,

    /// The domain-specific dead-end predicate holds for the current state.
    #[error("reached a dead end")]
    DeadEnd,

    /// The configured depth bound cut the search off.
    #[error("depth limit {bound} exceeded")]
    DepthExceeded { bound: u32 },

    /// The current state has no applicable rule and is not a goal.
    #[error("no applicable rules found")]
    NoApplicableRule,

    /// Every reachable state was tried without reaching a goal.
    #[error("search space exhausted without reaching a goal")]
    FrontierExhausted,

    /// A configured resource budget was exceeded.
    #[error("resource limit exceeded: {metric} (limit={limit}, observed={observed})")]
    LimitExceeded {
        metric: &'static str,
        limit: u64,
        observed: u64,
    },
}

impl SearchError {
    /// Returns `true` for outcomes that only end the current branch of a
    /// backtracking search, so the caller may try the next rule.
    pub fn is_branch_failure(&self) -> bool {
        matches!(
            self,
            SearchError::CycleDetected
                | SearchError::DeadEnd
                | SearchError::DepthExceeded { .. }
                | SearchError::NoApplicableRule
                | SearchError::FrontierExhausted
        )
    }
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_failures_are_recoverable() {
        assert!(SearchError::CycleDetected.is_branch_failure());
        assert!(SearchError::DeadEnd.is_branch_failure());
        assert!(SearchError::DepthExceeded { bound: 3 }.is_branch_failure());
        assert!(SearchError::NoApplicableRule.is_branch_failure());
        assert!(SearchError::FrontierExhausted.is_branch_failure());

        assert!(!SearchError::InvalidConfiguration("x".into()).is_branch_failure());
        assert!(!SearchError::LimitExceeded {
            metric: "expansions",
            limit: 1,
            observed: 2
        }
        .is_branch_failure());
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::DepthExceeded { bound: 7 };
        assert_eq!(err.to_string(), "depth limit 7 exceeded");

        let err = SearchError::PreconditionViolation {
            rule: "U".into(),
            state: "WWWW".into(),
        };
        assert!(err.to_string().contains("`U`"));
    }
}
