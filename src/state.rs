//! The State/Rule abstraction every search driver operates on.
//!
//! A [`State`] is an immutable puzzle configuration. It knows which rules are
//! legal against it and whether it is a goal. A [`Rule`] is a transition
//! descriptor: it checks its own precondition and computes the successor
//! configuration. Path bookkeeping (depth, parent) is not part of a state; the
//! drivers keep it in their own arena, so two states compare equal exactly when
//! their configurations do.

use std::fmt;
use std::hash::Hash;

use crate::error::{Result, SearchError};

/// A transition from one configuration of `S` to another.
pub trait Rule<S>: Clone + PartialEq + fmt::Debug + fmt::Display {
    /// Returns `true` if every cell this rule reads holds its required value.
    fn precondition(&self, state: &S) -> bool;

    /// Computes the successor configuration.
    ///
    /// Callers must have checked [`Rule::precondition`]; use [`Rule::apply`]
    /// for the checked form.
    fn transform(&self, state: &S) -> S;

    /// Fingerprint indices this rule may change when applied to `state`.
    fn writes(&self, state: &S) -> Vec<usize>;

    /// The rule that undoes this one, where the puzzle has one.
    fn inverse(&self) -> Option<Self> {
        None
    }

    /// Applies the rule after checking its precondition.
    ///
    /// # Errors
    /// Returns [`SearchError::PreconditionViolation`] if the precondition does
    /// not hold for `state`.
    fn apply(&self, state: &S) -> Result<S>
    where
        S: fmt::Display,
    {
        if !self.precondition(state) {
            return Err(SearchError::PreconditionViolation {
                rule: self.to_string(),
                state: state.to_string(),
            });
        }
        Ok(self.transform(state))
    }
}

/// A puzzle configuration that can be searched.
pub trait State: Clone + Eq + Hash + fmt::Debug + fmt::Display {
    /// The transition type for this puzzle.
    type Rule: Rule<Self>;

    /// Every rule whose precondition holds, in a deterministic order.
    fn legal_rules(&self) -> Vec<Self::Rule>;

    /// Exact-match test against the puzzle's goal.
    fn is_goal(&self) -> bool;

    /// Canonical flattened configuration, used for closed sets and path checks.
    fn fingerprint(&self) -> String;

    /// Domain-specific dead-end predicate. Never holds unless a puzzle says so.
    fn is_dead_end(&self) -> bool {
        false
    }

    /// Applies `rule` to this state.
    fn apply(&self, rule: &Self::Rule) -> Result<Self> {
        rule.apply(self)
    }
}
