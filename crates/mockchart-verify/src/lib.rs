//! # mockchart-verify
//!
//! Independent consistency checks for generated records and claims.
//!
//! - [`RecordVerifier`] re-derives every correlation the generators promise
//!   (age, BMI, range flags, medication purposes, claim chronology, pointers,
//!   totals, place of service) and reports each mismatch
//! - [`validate_claim_json`] checks the wire form of a claim against
//!   [`claim_schema`]
//! - [`fingerprint`] hashes a record for reproducibility checks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mockchart_verify::RecordVerifier;
//!
//! let verifier = RecordVerifier::default();
//! let report = verifier.verify_all(&record, &claim)?;
//! assert!(report.passed, "{:?}", report.failures);
//! ```

#![recursion_limit = "256"]

pub mod engine;
pub mod fingerprint;
pub mod rules;
pub mod schema;

pub use engine::{CustomVerifierFn, RecordVerifier};
pub use fingerprint::{claim_fingerprint, fingerprint};
pub use schema::{claim_schema, validate_claim_json};

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use mockchart_contracts::{
        claim::{Claim, DiagnosisPointer, PatientRelationship, PlaceOfService},
        clinical::ResultFlag,
        record::{Complexity, GenerationOptions, Record},
    };
    use mockchart_core::{ChartGenerator, FixedClock};

    use super::*;

    const SEEDS: u64 = 40;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn generator(seed: u64) -> ChartGenerator {
        ChartGenerator::new(seed, Box::new(FixedClock(today())))
    }

    fn record_and_claim(seed: u64) -> (Record, Claim) {
        let mut g = generator(seed);
        let options = GenerationOptions {
            complexity: Complexity::High,
            visit_count: 4,
            lab_test_count: 6,
            ..Default::default()
        };
        let record = g.generate_record(&options).unwrap();
        let claim = g.generate_claim(Some(&record), None);
        (record, claim)
    }

    fn rule_ids(report: &mockchart_contracts::verify::VerificationReport) -> Vec<&str> {
        report.failures.iter().map(|f| f.rule_id.as_str()).collect()
    }

    // ── 1. Generated output passes ─────────────────────────────────────────

    #[test]
    fn test_generated_records_and_claims_pass() {
        let verifier = RecordVerifier::default();
        for seed in 0..SEEDS {
            let (record, claim) = record_and_claim(seed);
            let report = verifier.verify_all(&record, &claim).unwrap();
            assert!(report.passed, "seed {seed}: {:?}", report.failures);
        }
    }

    #[test]
    fn test_standalone_claims_pass_without_record() {
        let verifier = RecordVerifier::default();
        for seed in 0..SEEDS {
            let claim = generator(seed).generate_claim(None, None);
            let report = verifier.verify_claim(&claim, None).unwrap();
            assert!(report.passed, "seed {seed}: {:?}", report.failures);
        }
    }

    #[test]
    fn test_generated_claims_match_schema() {
        for seed in 0..SEEDS {
            let (_, claim) = record_and_claim(seed);
            let payload = serde_json::to_value(&claim).unwrap();
            let report = validate_claim_json(&payload).unwrap();
            assert!(report.passed, "seed {seed}: {:?}", report.failures);
        }
    }

    // ── 2. Tampered records fail the matching rule ─────────────────────────

    #[test]
    fn test_wrong_age_fails_age_rule() {
        let (mut record, _) = record_and_claim(1);
        record.patient.age += 3;
        let report = RecordVerifier::default().verify_record(&record).unwrap();
        assert!(!report.passed);
        assert_eq!(rule_ids(&report), vec!["age"]);
    }

    #[test]
    fn test_changed_weight_fails_bmi_rule() {
        let (mut record, _) = record_and_claim(2);
        record.vitals[0].weight_lbs += 40.0;
        let report = RecordVerifier::default().verify_record(&record).unwrap();
        assert!(rule_ids(&report).contains(&"bmi"));
    }

    #[test]
    fn test_duplicate_medication_fails() {
        let (mut record, _) = record_and_claim(3);
        let first = record.medications.current[0].clone();
        record.medications.current.push(first);
        let report = RecordVerifier::default().verify_record(&record).unwrap();
        assert_eq!(rule_ids(&report), vec!["medication-unique"]);
    }

    #[test]
    fn test_flipped_vital_flag_fails() {
        let (mut record, _) = record_and_claim(4);
        let hr = &mut record.vitals[0].heart_rate;
        hr.flag = if hr.flag == ResultFlag::Normal {
            ResultFlag::Critical
        } else {
            ResultFlag::Normal
        };
        let report = RecordVerifier::default().verify_record(&record).unwrap();
        assert_eq!(rule_ids(&report), vec!["vital-flags"]);
    }

    #[test]
    fn test_repeated_secondary_payer_fails() {
        let (mut record, _) = record_and_claim(5);
        let mut secondary = record.insurance.primary_insurance.clone();
        secondary.policy_number.push('9');
        record.insurance.secondary_insurance = Some(secondary);
        let report = RecordVerifier::default().verify_record(&record).unwrap();
        assert_eq!(rule_ids(&report), vec!["secondary-distinct"]);
    }

    #[test]
    fn test_corrupted_npi_fails_luhn() {
        let (mut record, _) = record_and_claim(6);
        let last = record.provider.npi.pop().unwrap();
        let bumped = char::from_digit((last.to_digit(10).unwrap() + 1) % 10, 10).unwrap();
        record.provider.npi.push(bumped);
        let report = RecordVerifier::default().verify_record(&record).unwrap();
        assert_eq!(rule_ids(&report), vec!["npi-luhn"]);
    }

    // ── 3. Tampered claims fail the matching rule ──────────────────────────

    #[test]
    fn test_inflated_total_fails() {
        let (_, mut claim) = record_and_claim(7);
        claim.total_charges += 100.0;
        let report = RecordVerifier::default().verify_claim(&claim, None).unwrap();
        assert!(rule_ids(&report).contains(&"total-charges"));
    }

    #[test]
    fn test_pointer_past_last_code_fails() {
        let (_, mut claim) = record_and_claim(8);
        claim.diagnosis_codes.truncate(2);
        claim.service_lines[0].diagnosis_pointers = vec![DiagnosisPointer::D];
        let report = RecordVerifier::default().verify_claim(&claim, None).unwrap();
        assert!(rule_ids(&report).contains(&"pointer-validity"));
    }

    #[test]
    fn test_emergency_outside_er_fails() {
        let (_, mut claim) = record_and_claim(9);
        let line = &mut claim.service_lines[0];
        line.place_of_service = PlaceOfService::Office;
        line.procedure_code = "99213".to_string();
        line.emergency = true;
        let report = RecordVerifier::default().verify_claim(&claim, None).unwrap();
        assert!(rule_ids(&report).contains(&"emergency-pos"));
    }

    #[test]
    fn test_wrong_place_of_service_fails() {
        let (_, mut claim) = record_and_claim(10);
        let line = &mut claim.service_lines[0];
        line.place_of_service = match line.place_of_service {
            PlaceOfService::InpatientHospital => PlaceOfService::Office,
            _ => PlaceOfService::InpatientHospital,
        };
        line.emergency = false;
        let report = RecordVerifier::default().verify_claim(&claim, None).unwrap();
        assert_eq!(rule_ids(&report), vec!["place-of-service"]);
    }

    #[test]
    fn test_service_before_illness_fails_chronology() {
        let (_, mut claim) = record_and_claim(11);
        claim.date_of_illness = claim.service_date + chrono::Duration::days(5);
        let report = RecordVerifier::default().verify_claim(&claim, None).unwrap();
        assert!(rule_ids(&report).contains(&"date-chronology"));
    }

    #[test]
    fn test_relationship_checked_against_record() {
        let (record, mut claim) = record_and_claim(12);
        claim.patient_relationship = match claim.patient_relationship {
            PatientRelationship::SelfInsured => PatientRelationship::Spouse,
            _ => PatientRelationship::SelfInsured,
        };
        let verifier = RecordVerifier::default();
        assert!(verifier.verify_claim(&claim, None).unwrap().passed);
        let report = verifier.verify_claim(&claim, Some(&record)).unwrap();
        assert_eq!(rule_ids(&report), vec!["relationship"]);
    }

    // ── 4. Custom rules ────────────────────────────────────────────────────

    #[test]
    fn test_custom_record_rule_sees_json() {
        let (record, _) = record_and_claim(13);
        let mut verifier = RecordVerifier::new();
        verifier.register_rule(
            "adults-only",
            Box::new(|v: &serde_json::Value| {
                let age = v["patient"]["age"].as_u64()?;
                (age < 200).then(|| format!("age {age} is below 200"))
            }),
        );
        let report = verifier.verify_record(&record).unwrap();
        assert_eq!(rule_ids(&report), vec!["adults-only"]);
    }

    #[test]
    fn test_custom_claim_rule_passes_when_none() {
        let (record, claim) = record_and_claim(14);
        let mut verifier = RecordVerifier::new();
        verifier.register_claim_rule(
            "has-lines",
            Box::new(|v: &serde_json::Value| {
                v["serviceLines"]
                    .as_array()
                    .filter(|lines| lines.is_empty())
                    .map(|_| "no service lines".to_string())
            }),
        );
        assert!(verifier.verify_all(&record, &claim).unwrap().passed);
    }

    // ── 5. Schema ──────────────────────────────────────────────────────────

    #[test]
    fn test_schema_rejects_missing_and_malformed_fields() {
        let (_, claim) = record_and_claim(15);
        let mut payload = serde_json::to_value(&claim).unwrap();
        let obj = payload.as_object_mut().unwrap();
        obj.remove("totalCharges");
        obj.insert("diagnosisCodes".into(), serde_json::json!(["not-a-code"]));

        let report = validate_claim_json(&payload).unwrap();
        assert!(!report.passed);
        assert!(report.failures.iter().all(|f| f.rule_id == "json-schema"));
        assert!(report.failures.len() >= 2);
    }

    #[test]
    fn test_claim_schema_compiles_and_checks_service_lines() {
        let schema = claim_schema();
        assert!(jsonschema::validator_for(&schema).is_ok());
        let required = schema["properties"]["serviceLines"]["items"]["required"]
            .as_array()
            .unwrap();
        assert!(required.iter().any(|v| v == "procedureCode"));

        let (_, claim) = record_and_claim(16);
        let mut payload = serde_json::to_value(&claim).unwrap();
        payload["serviceLines"][0]
            .as_object_mut()
            .unwrap()
            .remove("procedureCode");
        payload["serviceLines"][0]["placeOfService"] = serde_json::json!("99");
        let report = validate_claim_json(&payload).unwrap();
        assert_eq!(report.failures.len(), 2, "{:?}", report.failures);
    }

    #[test]
    fn test_claim_from_untidy_pool_matches_schema() {
        let pool: Vec<String> = ["", " i10 ", "e11.9", "??"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        for seed in 0..10 {
            let claim = generator(seed).generate_claim(None, Some(&pool));
            assert_eq!(claim.diagnosis_codes, vec!["I10", "E11.9"]);
            let report = validate_claim_json(&serde_json::to_value(&claim).unwrap()).unwrap();
            assert!(report.passed, "seed {seed}: {:?}", report.failures);
        }
    }

    // ── 6. Fingerprints ────────────────────────────────────────────────────

    #[test]
    fn test_fingerprint_is_stable_per_seed() {
        let a = fingerprint(&record_and_claim(21).0).unwrap();
        let b = fingerprint(&record_and_claim(21).0).unwrap();
        let c = fingerprint(&record_and_claim(22).0).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn test_claim_fingerprint_changes_with_content() {
        let (_, mut claim) = record_and_claim(23);
        let before = claim_fingerprint(&claim).unwrap();
        claim.accept_assignment = !claim.accept_assignment;
        assert_ne!(before, claim_fingerprint(&claim).unwrap());
    }
}
