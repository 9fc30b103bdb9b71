//! Built-in consistency rules.
//!
//! Each rule inspects one property and returns every violation it finds as a
//! message. Rule ids are stable and appear in `VerificationFailure::rule_id`.

use std::collections::HashSet;

use mockchart_contracts::{
    claim::{Claim, DiagnosisPointer, PatientRelationship, PlaceOfService},
    clinical::{LabValue, ResultFlag, VitalSigns},
    record::Record,
};
use mockchart_core::{
    correlate::classify,
    identity::is_valid_npi,
    labs::{panel_analytes, AnalyteKind},
    medications::condition_drugs,
    rng::{age_on, round_to},
    vitals,
};

pub type RecordRule = fn(&Record) -> Vec<String>;
pub type ClaimRule = fn(&Claim) -> Vec<String>;

/// `(rule_id, rule)` for every built-in record rule, in evaluation order.
pub const RECORD_RULES: &[(&str, RecordRule)] = &[
    ("age", age),
    ("bmi", bmi),
    ("secondary-distinct", secondary_distinct),
    ("medication-unique", medication_unique),
    ("medication-purpose", medication_purpose),
    ("vital-flags", vital_flags),
    ("lab-flags", lab_flags),
    ("npi-luhn", npi_luhn),
];

/// `(rule_id, rule)` for every built-in claim rule that needs only the claim.
pub const CLAIM_RULES: &[(&str, ClaimRule)] = &[
    ("date-chronology", date_chronology),
    ("pointer-validity", pointer_validity),
    ("total-charges", total_charges),
    ("place-of-service", place_of_service),
    ("emergency-pos", emergency_pos),
];

// ── Record rules ──────────────────────────────────────────────────────────────

fn age(record: &Record) -> Vec<String> {
    let p = &record.patient;
    let expected = age_on(p.date_of_birth, record.generated_on);
    if p.age == expected {
        Vec::new()
    } else {
        vec![format!(
            "age {} does not match date of birth {} (expected {})",
            p.age, p.date_of_birth, expected
        )]
    }
}

fn all_vitals(record: &Record) -> impl Iterator<Item = &VitalSigns> {
    record
        .vitals
        .iter()
        .chain(record.visits.iter().map(|v| &v.vitals))
}

fn bmi(record: &Record) -> Vec<String> {
    all_vitals(record)
        .filter(|v| v.bmi.value != vitals::bmi(v.weight_lbs, v.height_in))
        .map(|v| {
            format!(
                "bmi {} on {} is not derived from weight {} and height {}",
                v.bmi.value, v.recorded_on, v.weight_lbs, v.height_in
            )
        })
        .collect()
}

fn secondary_distinct(record: &Record) -> Vec<String> {
    match &record.insurance.secondary_insurance {
        Some(secondary) if secondary.provider == record.insurance.primary_insurance.provider => {
            vec![format!(
                "secondary payer '{}' repeats the primary payer",
                secondary.provider
            )]
        }
        _ => Vec::new(),
    }
}

fn medication_unique(record: &Record) -> Vec<String> {
    let mut seen = HashSet::new();
    record
        .medications
        .current
        .iter()
        .filter(|m| !seen.insert(m.name.as_str()))
        .map(|m| format!("medication '{}' listed more than once", m.name))
        .collect()
}

fn medication_purpose(record: &Record) -> Vec<String> {
    let mut messages = Vec::new();
    for med in &record.medications.current {
        let Some(kind) = med.indication else { continue };
        if !record.medical_history.has_condition(kind) {
            messages.push(format!(
                "medication '{}' indicated for {:?} which is not on the problem list",
                med.name, kind
            ));
        }
        match condition_drugs(kind) {
            Some((_, purpose)) if med.purpose == purpose => {}
            _ => messages.push(format!(
                "medication '{}' purpose '{}' does not match its indication {:?}",
                med.name, med.purpose, kind
            )),
        }
    }
    messages
}

fn vital_flags(record: &Record) -> Vec<String> {
    let mut messages = Vec::new();
    for v in all_vitals(record) {
        let bp = v.blood_pressure;
        let expected_bp = vitals::worst_flag(
            classify(bp.systolic as f64, &vitals::systolic_spec()),
            classify(bp.diastolic as f64, &vitals::diastolic_spec()),
        );
        let checks = [
            ("blood pressure", bp.flag, expected_bp),
            (
                "heart rate",
                v.heart_rate.flag,
                classify(v.heart_rate.value, &vitals::heart_rate_spec()),
            ),
            (
                "respiratory rate",
                v.respiratory_rate.flag,
                classify(v.respiratory_rate.value, &vitals::respiratory_rate_spec()),
            ),
            (
                "temperature",
                v.temperature_f.flag,
                classify(v.temperature_f.value, &vitals::temperature_spec()),
            ),
            (
                "oxygen saturation",
                v.oxygen_saturation.flag,
                classify(v.oxygen_saturation.value, &vitals::oxygen_saturation_spec()),
            ),
            ("bmi", v.bmi.flag, classify(v.bmi.value, &vitals::bmi_spec())),
        ];
        for (name, actual, expected) in checks {
            if actual != expected {
                messages.push(format!(
                    "{} on {} flagged {:?}, expected {:?}",
                    name, v.recorded_on, actual, expected
                ));
            }
        }
    }
    messages
}

fn lab_flags(record: &Record) -> Vec<String> {
    let mut messages = Vec::new();
    for report in &record.labs {
        let analytes = panel_analytes(report.test_type);
        for result in &report.results {
            let Some(analyte) = analytes.iter().find(|a| a.name == result.test_name) else {
                messages.push(format!(
                    "{} has unknown analyte '{}'",
                    report.test_type, result.test_name
                ));
                continue;
            };
            let expected = match (&analyte.kind, &result.value) {
                (AnalyteKind::Numeric { spec, .. }, LabValue::Numeric(v)) => classify(*v, spec),
                (AnalyteKind::Categorical(options), LabValue::Text(v)) => {
                    if options.first() == Some(&v.as_str()) {
                        ResultFlag::Normal
                    } else {
                        ResultFlag::Abnormal
                    }
                }
                _ => {
                    messages.push(format!(
                        "{} '{}' has the wrong value kind",
                        report.test_type, result.test_name
                    ));
                    continue;
                }
            };
            if result.flag != expected {
                messages.push(format!(
                    "{} '{}' flagged {:?}, expected {:?}",
                    report.test_type, result.test_name, result.flag, expected
                ));
            }
        }
    }
    messages
}

fn npi_luhn(record: &Record) -> Vec<String> {
    [
        ("provider", &record.provider.npi),
        ("facility", &record.provider.facility.npi),
    ]
    .into_iter()
    .filter(|(_, npi)| !is_valid_npi(npi))
    .map(|(owner, npi)| format!("{owner} NPI '{npi}' fails the Luhn check"))
    .collect()
}

// ── Claim rules ───────────────────────────────────────────────────────────────

fn date_chronology(claim: &Claim) -> Vec<String> {
    let mut messages = Vec::new();
    let chain = [
        ("date of illness", claim.date_of_illness),
        ("service date", claim.service_date),
        ("provider signature", claim.provider_signature_date),
        ("patient signature", claim.patient_signature_date),
    ];
    for pair in chain.windows(2) {
        let ((a_name, a), (b_name, b)) = (pair[0], pair[1]);
        if a > b {
            messages.push(format!("{a_name} {a} is after {b_name} {b}"));
        }
    }
    for (name, window) in [
        ("hospitalization", claim.hospitalization),
        ("unable to work", claim.unable_to_work),
    ] {
        if let Some(w) = window {
            if w.from < claim.date_of_illness || w.from > w.to {
                messages.push(format!(
                    "{name} window {}..{} is out of order with illness date {}",
                    w.from, w.to, claim.date_of_illness
                ));
            }
        }
    }
    for line in &claim.service_lines {
        if line.date_from != claim.service_date || line.date_to != claim.service_date {
            messages.push(format!(
                "line {} is not dated on the service date",
                line.procedure_code
            ));
        }
    }
    messages
}

fn pointer_validity(claim: &Claim) -> Vec<String> {
    let mut messages = Vec::new();
    let count = claim.diagnosis_codes.len();
    if !(2..=4).contains(&count) {
        messages.push(format!("claim lists {count} diagnosis codes, expected 2 to 4"));
    }
    for line in &claim.service_lines {
        if line.diagnosis_pointers.is_empty() {
            messages.push(format!("line {} has no diagnosis pointer", line.procedure_code));
        }
        if let Some(p) = line
            .diagnosis_pointers
            .iter()
            .find(|p| p.index() >= count.min(DiagnosisPointer::ALL.len()))
        {
            messages.push(format!(
                "line {} points to {} but only {} diagnoses are listed",
                line.procedure_code, p, count
            ));
        }
        if !line.diagnosis_pointers.windows(2).all(|w| w[0] < w[1]) {
            messages.push(format!(
                "line {} pointers are not sorted and unique",
                line.procedure_code
            ));
        }
    }
    messages
}

fn total_charges(claim: &Claim) -> Vec<String> {
    let mut messages = Vec::new();
    let sum: f64 = claim.service_lines.iter().map(|l| l.charges).sum();
    let expected = round_to(sum, 2);
    if claim.total_charges != expected {
        messages.push(format!(
            "total charges {} do not equal the line sum {}",
            claim.total_charges, expected
        ));
    }
    if claim.amount_paid > claim.total_charges {
        messages.push(format!(
            "amount paid {} exceeds total charges {}",
            claim.amount_paid, claim.total_charges
        ));
    }
    let balance = round_to(claim.total_charges - claim.amount_paid, 2);
    if claim.balance_due != balance {
        messages.push(format!(
            "balance due {} is not total minus paid ({})",
            claim.balance_due, balance
        ));
    }
    messages
}

fn place_of_service(claim: &Claim) -> Vec<String> {
    claim
        .service_lines
        .iter()
        .filter_map(|line| {
            let expected = mockchart_core::claim::place_of_service(&line.procedure_code);
            (line.place_of_service != expected).then(|| {
                format!(
                    "line {} billed at POS {}, expected {}",
                    line.procedure_code,
                    line.place_of_service.code(),
                    expected.code()
                )
            })
        })
        .collect()
}

fn emergency_pos(claim: &Claim) -> Vec<String> {
    claim
        .service_lines
        .iter()
        .filter(|l| l.emergency && l.place_of_service != PlaceOfService::EmergencyRoom)
        .map(|l| {
            format!(
                "line {} marked emergency at POS {}",
                l.procedure_code,
                l.place_of_service.code()
            )
        })
        .collect()
}

/// Box 6 must read `self` exactly when the subscriber is the patient.
pub fn relationship(claim: &Claim, record: &Record) -> Vec<String> {
    let same = record.insurance.subscriber_name == record.patient.full_name();
    let is_self = claim.patient_relationship == PatientRelationship::SelfInsured;
    if same == is_self {
        Vec::new()
    } else {
        vec![format!(
            "relationship {:?} inconsistent with subscriber '{}' and patient '{}'",
            claim.patient_relationship,
            record.insurance.subscriber_name,
            record.patient.full_name()
        )]
    }
}
