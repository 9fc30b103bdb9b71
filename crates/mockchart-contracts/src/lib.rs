//! # mockchart-contracts
//!
//! Shared record types and errors for the mockchart generators.
//!
//! All crates in the workspace import from here. No generation logic lives
//! in this crate, only plain serializable value objects and error types.
//! Every type round-trips through JSON so presentation collaborators can
//! persist, diff or render a record without reaching into the generators.

pub mod claim;
pub mod clinical;
pub mod error;
pub mod history;
pub mod insurance;
pub mod medication;
pub mod patient;
pub mod record;
pub mod verify;

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use claim::{DiagnosisPointer, PatientRelationship, PlaceOfService};
    use clinical::{LabTestType, LabValue, ResultFlag};
    use error::MockchartError;
    use history::{ChronicCondition, ConditionCategory, ConditionKind, ConditionStatus};
    use record::{Complexity, GenerationOptions};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── DiagnosisPointer ─────────────────────────────────────────────────────

    #[test]
    fn pointer_from_index_follows_code_order() {
        assert_eq!(DiagnosisPointer::from_index(0), Some(DiagnosisPointer::A));
        assert_eq!(DiagnosisPointer::from_index(3), Some(DiagnosisPointer::D));
        assert_eq!(DiagnosisPointer::from_index(4), None);
        assert_eq!(DiagnosisPointer::C.index(), 2);
    }

    #[test]
    fn pointer_serializes_as_letter() {
        let json = serde_json::to_string(&vec![DiagnosisPointer::A, DiagnosisPointer::C]).unwrap();
        assert_eq!(json, r#"["A","C"]"#);
    }

    #[test]
    fn pointers_sort_alphabetically() {
        let mut pointers = vec![DiagnosisPointer::C, DiagnosisPointer::A, DiagnosisPointer::B];
        pointers.sort();
        assert_eq!(
            pointers,
            vec![DiagnosisPointer::A, DiagnosisPointer::B, DiagnosisPointer::C]
        );
    }

    #[test]
    fn icd10_shape_accepts_billing_codes_only() {
        for good in ["I10", "E11.9", "S93.401A", "J45.909", "M54.50"] {
            assert!(claim::is_icd10_code(good), "{good}");
        }
        for bad in ["", "10", "i10", "E1", "E11.", "E11.12345", "E11-9", " I10"] {
            assert!(!claim::is_icd10_code(bad), "{bad}");
        }
    }

    // ── Place of service / relationship wire format ──────────────────────────

    #[test]
    fn place_of_service_serializes_as_two_digit_code() {
        assert_eq!(
            serde_json::to_string(&PlaceOfService::EmergencyRoom).unwrap(),
            r#""23""#
        );
        let decoded: PlaceOfService = serde_json::from_str(r#""24""#).unwrap();
        assert_eq!(decoded, PlaceOfService::AmbulatorySurgicalCenter);
        assert_eq!(decoded.code(), "24");
    }

    #[test]
    fn relationship_self_uses_lowercase_keyword() {
        assert_eq!(
            serde_json::to_string(&PatientRelationship::SelfInsured).unwrap(),
            r#""self""#
        );
        assert_eq!(
            serde_json::to_string(&PatientRelationship::Spouse).unwrap(),
            r#""spouse""#
        );
    }

    // ── Conditions ───────────────────────────────────────────────────────────

    #[test]
    fn chronic_condition_fields_follow_kind() {
        let condition = ChronicCondition::new(
            ConditionKind::Copd,
            date(2019, 4, 2),
            ConditionStatus::Managed,
        );
        assert_eq!(condition.icd_code, "J44.9");
        assert_eq!(condition.category, ConditionCategory::Respiratory);
        assert!(condition.name.contains("COPD"));
    }

    #[test]
    fn every_condition_has_a_distinct_icd_code() {
        let codes: std::collections::HashSet<&str> =
            ConditionKind::ALL.iter().map(|k| k.icd_code()).collect();
        assert_eq!(codes.len(), ConditionKind::ALL.len());
    }

    // ── Lab types ────────────────────────────────────────────────────────────

    #[test]
    fn lab_type_parses_from_slug() {
        for t in LabTestType::ALL {
            assert_eq!(t.slug().parse::<LabTestType>().unwrap(), t);
        }
        assert_eq!(" CBC ".parse::<LabTestType>().unwrap(), LabTestType::CompleteBloodCount);
    }

    #[test]
    fn lab_type_unknown_name_is_an_error() {
        let err = "bloodwork".parse::<LabTestType>().unwrap_err();
        assert!(matches!(err, MockchartError::UnknownLabTest { .. }));
        assert!(err.to_string().contains("bloodwork"));
    }

    #[test]
    fn lab_value_is_untagged_on_the_wire() {
        assert_eq!(serde_json::to_string(&LabValue::Numeric(5.4)).unwrap(), "5.4");
        assert_eq!(
            serde_json::to_string(&LabValue::Text("Yellow".into())).unwrap(),
            r#""Yellow""#
        );
        let decoded: LabValue = serde_json::from_str(r#""Clear""#).unwrap();
        assert_eq!(decoded, LabValue::Text("Clear".into()));
    }

    #[test]
    fn result_flag_severity_orders_critical_last() {
        assert!(ResultFlag::Critical.severity() > ResultFlag::High.severity());
        assert!(ResultFlag::Low.severity() > ResultFlag::Normal.severity());
        assert!(!ResultFlag::Normal.is_abnormal());
        assert!(ResultFlag::Abnormal.is_abnormal());
    }

    // ── Options ──────────────────────────────────────────────────────────────

    #[test]
    fn complexity_scales_condition_count() {
        assert_eq!(Complexity::Low.condition_count(), 2);
        assert_eq!(Complexity::Medium.condition_count(), 4);
        assert_eq!(Complexity::High.condition_count(), 6);
    }

    #[test]
    fn options_fill_missing_fields_from_default() {
        let options: GenerationOptions =
            serde_json::from_str(r#"{ "complexity": "high" }"#).unwrap();
        assert_eq!(options.complexity, Complexity::High);
        assert_eq!(options.visit_count, GenerationOptions::default().visit_count);
    }

    #[test]
    fn options_validate_bounds() {
        assert!(GenerationOptions::default().validate().is_ok());
        let too_many_visits = GenerationOptions {
            visit_count: 13,
            ..Default::default()
        };
        assert!(matches!(
            too_many_visits.validate(),
            Err(MockchartError::InvalidOptions { .. })
        ));
        let too_many_labs = GenerationOptions {
            lab_test_count: 7,
            ..Default::default()
        };
        assert!(too_many_labs.validate().is_err());
    }

    // ── Errors ───────────────────────────────────────────────────────────────

    #[test]
    fn error_config_display() {
        let err = MockchartError::ConfigError {
            reason: "missing seed".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("missing seed"));
    }

    #[test]
    fn error_from_serde_json() {
        let json_err = serde_json::from_str::<GenerationOptions>("{").unwrap_err();
        let err: MockchartError = json_err.into();
        assert!(err.to_string().starts_with("serialization error"));
    }
}
