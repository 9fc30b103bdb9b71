//! Record and claim consistency verifier.
//!
//! `RecordVerifier` runs in two phases:
//!
//! 1. **Built-in rules** from [`crate::rules`], each re-deriving one
//!    correlation (age from birth date, flags from ranges, totals from
//!    lines) and reporting every mismatch.
//! 2. **Custom rules** registered by the caller, evaluated over the JSON form
//!    of the record or claim.
//!
//! All failures are collected before returning.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use mockchart_contracts::{
    claim::Claim,
    error::MockchartResult,
    record::Record,
    verify::{VerificationFailure, VerificationReport},
};

use crate::rules::{self, CLAIM_RULES, RECORD_RULES};

/// A caller-supplied check over a serialized record or claim.
///
/// Returns `Some(message)` when the check fails, `None` on success.
pub type CustomVerifierFn = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;

pub struct RecordVerifier {
    record_rules: BTreeMap<String, CustomVerifierFn>,
    claim_rules: BTreeMap<String, CustomVerifierFn>,
}

impl RecordVerifier {
    /// Create a verifier with only the built-in rules.
    pub fn new() -> Self {
        Self {
            record_rules: BTreeMap::new(),
            claim_rules: BTreeMap::new(),
        }
    }

    /// Register a custom rule run against every verified record.
    ///
    /// Registering the same name twice replaces the previous function.
    pub fn register_rule(&mut self, name: impl Into<String>, f: CustomVerifierFn) {
        self.record_rules.insert(name.into(), f);
    }

    /// Register a custom rule run against every verified claim.
    pub fn register_claim_rule(&mut self, name: impl Into<String>, f: CustomVerifierFn) {
        self.claim_rules.insert(name.into(), f);
    }

    /// Check a record's internal correlations.
    pub fn verify_record(&self, record: &Record) -> MockchartResult<VerificationReport> {
        let mut failures = Vec::new();

        for (rule_id, rule) in RECORD_RULES {
            debug!(rule_id, record_id = %record.record_id, "evaluating record rule");
            collect(&mut failures, rule_id, rule(record));
        }

        if !self.record_rules.is_empty() {
            let payload = serde_json::to_value(record)?;
            run_custom(&mut failures, &self.record_rules, &payload);
        }

        Ok(VerificationReport::from_failures(failures))
    }

    /// Check a claim on its own. When the record it was billed from is
    /// supplied, the box 6 relationship is checked against it too.
    pub fn verify_claim(
        &self,
        claim: &Claim,
        record: Option<&Record>,
    ) -> MockchartResult<VerificationReport> {
        let mut failures = Vec::new();

        for (rule_id, rule) in CLAIM_RULES {
            debug!(rule_id, claim_number = %claim.claim_number, "evaluating claim rule");
            collect(&mut failures, rule_id, rule(claim));
        }
        if let Some(record) = record {
            collect(&mut failures, "relationship", rules::relationship(claim, record));
        }

        if !self.claim_rules.is_empty() {
            let payload = serde_json::to_value(claim)?;
            run_custom(&mut failures, &self.claim_rules, &payload);
        }

        Ok(VerificationReport::from_failures(failures))
    }

    /// Verify a record and a claim billed from it in one report.
    pub fn verify_all(&self, record: &Record, claim: &Claim) -> MockchartResult<VerificationReport> {
        let report = self.verify_record(record)?;
        Ok(report.merge(self.verify_claim(claim, Some(record))?))
    }
}

impl Default for RecordVerifier {
    fn default() -> Self {
        Self::new()
    }
}

fn collect(failures: &mut Vec<VerificationFailure>, rule_id: &str, messages: Vec<String>) {
    for message in messages {
        warn!(rule_id, %message, "verification failure");
        failures.push(VerificationFailure {
            rule_id: rule_id.to_string(),
            message,
        });
    }
}

fn run_custom(
    failures: &mut Vec<VerificationFailure>,
    rules: &BTreeMap<String, CustomVerifierFn>,
    payload: &Value,
) {
    for (name, f) in rules {
        debug!(rule_id = %name, "evaluating custom rule");
        if let Some(message) = f(payload) {
            collect(failures, name, vec![message]);
        }
    }
}
