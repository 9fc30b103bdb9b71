//! Verification report types.
//!
//! A verifier runs named rules over a generated record and collects every
//! failure into one report.

use serde::{Deserialize, Serialize};

/// The result of running all rules against a record or claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if all rules passed.
    pub passed: bool,
    /// All failures collected during this run. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    pub fn from_failures(failures: Vec<VerificationFailure>) -> Self {
        Self {
            passed: failures.is_empty(),
            failures,
        }
    }

    /// Fold another report into this one.
    pub fn merge(mut self, other: VerificationReport) -> Self {
        self.failures.extend(other.failures);
        self.passed = self.failures.is_empty();
        self
    }
}

/// A single rule failure within a `VerificationReport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// The id of the rule that failed.
    pub rule_id: String,
    /// Human-readable explanation of why the rule failed.
    pub message: String,
}
