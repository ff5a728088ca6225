//! Call governor: decides whether an extracted call may execute.
//!
//! Three checks run in order:
//!
//! 1. the function exists in the catalog (exact name match);
//! 2. the call supplies exactly the declared argument keys, in any order;
//! 3. the same name and argument values were not already approved this pass.
//!
//! Validation is stateless ([`validate_call`]). The dedupe ledger is the only
//! state and lives inside one [`CallGovernor`], which is created per pass and
//! dropped with it.
//!
//! ```rust
//! use ai_lib_promptcall::governor::{CallGovernor, Verdict};
//! use ai_lib_promptcall::types::{Catalog, FunctionCall, FunctionDefinition};
//! use serde_json::json;
//!
//! let catalog = Catalog::new(vec![
//!     FunctionDefinition::new("get_weather", "Weather").parameter("city", json!({"type": "string"})),
//! ])
//! .unwrap();
//! let call = FunctionCall::from_value("get_weather", json!({"city": "Rome"})).unwrap();
//!
//! let mut governor = CallGovernor::new();
//! assert!(matches!(governor.review(call.clone(), &catalog), Verdict::Approved(_)));
//! assert!(matches!(governor.review(call, &catalog), Verdict::SuppressedDuplicate(_)));
//! ```

pub mod ledger;
pub mod validation;

pub use ledger::{DedupeKey, DedupeLedger};
pub use validation::{same_members, validate_call, RejectReason, ValidationResult};

use crate::types::{Catalog, FunctionCall};

/// Outcome of reviewing one candidate call.
///
/// Only `Approved` may be executed; `Rejected` and `SuppressedDuplicate` both
/// mean "do not execute".
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Approved(FunctionCall),
    Rejected {
        call: FunctionCall,
        reason: RejectReason,
    },
    SuppressedDuplicate(FunctionCall),
}

impl Verdict {
    pub fn is_approved(&self) -> bool {
        matches!(self, Verdict::Approved(_))
    }

    pub fn approved(self) -> Option<FunctionCall> {
        match self {
            Verdict::Approved(call) => Some(call),
            _ => None,
        }
    }

    pub fn call(&self) -> &FunctionCall {
        match self {
            Verdict::Approved(call)
            | Verdict::Rejected { call, .. }
            | Verdict::SuppressedDuplicate(call) => call,
        }
    }
}

#[derive(Debug, Default)]
pub struct CallGovernor {
    ledger: DedupeLedger,
}

impl CallGovernor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self, call: &FunctionCall, catalog: &Catalog) -> ValidationResult {
        validate_call(call, catalog)
    }

    /// Validate, then dedupe. Approval records the call in the ledger;
    /// rejection and suppression leave the ledger untouched.
    pub fn review(&mut self, call: FunctionCall, catalog: &Catalog) -> Verdict {
        if let Some(reason) = validate_call(&call, catalog).reason {
            return Verdict::Rejected { call, reason };
        }
        let key = DedupeKey::for_call(&call);
        if self.ledger.contains(&key) {
            return Verdict::SuppressedDuplicate(call);
        }
        self.ledger.insert(key);
        Verdict::Approved(call)
    }

    pub fn ledger(&self) -> &DedupeLedger {
        &self.ledger
    }

    /// Forget every approved call, as at the start of a new pass.
    pub fn reset(&mut self) {
        self.ledger.clear();
    }
}
