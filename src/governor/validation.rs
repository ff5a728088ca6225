//! Stateless validation of a call against the catalog.

use crate::types::{Catalog, FunctionCall};
use std::collections::HashMap;
use std::hash::Hash;

/// Why a call was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnknownFunction,
    ArgumentMismatch,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::UnknownFunction => "function name does not exist.",
            RejectReason::ArgumentMismatch => "invalid argument schema match.",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of validating a call; `reason` is set only when invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: Option<RejectReason>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn failure(reason: RejectReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Existence check, then argument key-set check. Values are not inspected.
pub fn validate_call(call: &FunctionCall, catalog: &Catalog) -> ValidationResult {
    let Some(def) = catalog.get(&call.name) else {
        return ValidationResult::failure(RejectReason::UnknownFunction);
    };
    let declared: Vec<&str> = def.parameters.keys().collect();
    if !same_members(&declared, &call.argument_keys()) {
        return ValidationResult::failure(RejectReason::ArgumentMismatch);
    }
    ValidationResult::success()
}

/// Multiset equality: same items with the same multiplicities, any order.
pub fn same_members<T: Eq + Hash>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut counts: HashMap<&T, isize> = HashMap::with_capacity(a.len());
    for item in a {
        *counts.entry(item).or_insert(0) += 1;
    }
    for item in b {
        match counts.get_mut(item) {
            Some(n) if *n > 0 => *n -= 1,
            _ => return false,
        }
    }
    true
}
