//! CMS-1500 claim generator.
//!
//! Assembly order matters:
//!
//! 1. Diagnosis codes are chosen first. Their order fixes the pointer
//!    letters A to D.
//! 2. The date chain is built, each stage derived from the one before.
//! 3. Service lines are gathered per diagnosis, then narrowed to the final
//!    one to four lines.
//! 4. Totals are computed from the lines. `amount_paid` is sampled and
//!    clamped to the total; `balance_due` is derived.
//!
//! The relationship box is filled last, after both the patient and the
//! subscriber names are final.

pub mod codes;
pub mod dates;
pub mod services;

use chrono::NaiveDate;
use rand::Rng;
use tracing::debug;

use mockchart_contracts::{
    claim::{
        Claim, ClaimFacility, ConditionRelatedTo, InsuranceType, OtherInsured, PatientRelationship,
        PlaceOfService,
    },
    history::ChronicCondition,
    insurance::InsuranceInfo,
    patient::{Patient, Provider},
};

use crate::rng::{chance, digits, money, pick, round_to, uuid};

pub use codes::select_diagnoses;
pub use dates::{generate_dates, ClaimDates};
pub use services::{build_service_lines, place_of_service};

const PAID_PROBABILITY: f64 = 0.3;
const ACCEPT_ASSIGNMENT_PROBABILITY: f64 = 0.9;
const CONDITION_RELATED_PROBABILITY: f64 = 0.05;
const PRIOR_AUTH_PROBABILITY: f64 = 0.5;

/// Box 6. `self` exactly when the subscriber is the patient by name.
pub fn relationship<R: Rng>(
    rng: &mut R,
    patient: &Patient,
    insurance: &InsuranceInfo,
) -> PatientRelationship {
    if insurance.subscriber_name == patient.full_name() {
        PatientRelationship::SelfInsured
    } else {
        *pick(
            rng,
            &[
                PatientRelationship::Spouse,
                PatientRelationship::Child,
                PatientRelationship::Other,
            ],
        )
    }
}

fn insurance_type(payer: &str) -> InsuranceType {
    match payer {
        "Medicare" => InsuranceType::Medicare,
        "Medicaid" => InsuranceType::Medicaid,
        _ => InsuranceType::GroupHealthPlan,
    }
}

/// Generate a claim for `patient`.
///
/// `pool` overrides diagnosis selection; otherwise `conditions` seed it.
pub fn generate_claim<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    patient: &Patient,
    provider: &Provider,
    insurance: &InsuranceInfo,
    conditions: &[ChronicCondition],
    pool: Option<&[String]>,
) -> Claim {
    let claim_number = uuid(rng).to_string();

    // ── Diagnoses, dates and lines ───────────────────────────────────────────
    let diagnosis_codes = select_diagnoses(rng, pool, conditions);
    let dates = generate_dates(rng, today);
    let service_lines =
        build_service_lines(rng, &diagnosis_codes, dates.service_date, &provider.npi);

    // ── Totals ───────────────────────────────────────────────────────────────
    let total_charges = round_to(service_lines.iter().map(|l| l.charges).sum(), 2);
    let amount_paid = if chance(rng, PAID_PROBABILITY) {
        money(rng, 10.0, 200.0).min(total_charges)
    } else {
        0.0
    };
    let balance_due = round_to(total_charges - amount_paid, 2);

    // ── Header ───────────────────────────────────────────────────────────────
    let primary = &insurance.primary_insurance;
    let other_insured = insurance
        .secondary_insurance
        .as_ref()
        .map(|secondary| OtherInsured {
            name: insurance.subscriber_name.clone(),
            policy_number: secondary.policy_number.clone(),
            plan_name: format!("{} {}", secondary.provider, secondary.plan_type.code()),
        });

    let auto_accident = chance(rng, CONDITION_RELATED_PROBABILITY);
    let condition_related_to = ConditionRelatedTo {
        employment: chance(rng, CONDITION_RELATED_PROBABILITY),
        auto_accident,
        accident_state: auto_accident.then(|| patient.address.state.clone()),
        other_accident: chance(rng, CONDITION_RELATED_PROBABILITY),
    };

    let needs_authorization = service_lines.iter().any(|l| {
        matches!(
            l.place_of_service,
            PlaceOfService::OutpatientHospital | PlaceOfService::AmbulatorySurgicalCenter
        )
    });
    let prior_authorization_number = (needs_authorization && chance(rng, PRIOR_AUTH_PROBABILITY))
        .then(|| format!("PA{}", digits(rng, 9)));

    let facility = &provider.facility;
    let service_facility = ClaimFacility {
        name: facility.name.clone(),
        address: facility.address.clone(),
        phone: facility.phone.clone(),
        npi: facility.npi.clone(),
    };
    let billing_provider = ClaimFacility {
        name: format!("{} Medical Group", provider.last_name),
        address: provider.address.clone(),
        phone: provider.phone.clone(),
        npi: provider.npi.clone(),
    };

    let patient_relationship = relationship(rng, patient, insurance);

    debug!(
        %claim_number,
        diagnoses = diagnosis_codes.len(),
        lines = service_lines.len(),
        total_charges,
        "claim generated"
    );

    Claim {
        claim_number,
        insurance_type: insurance_type(&primary.provider),
        insured_id: primary.member_id.clone(),
        patient_name: patient.claim_name(),
        patient_date_of_birth: patient.date_of_birth,
        patient_gender: patient.gender,
        patient_address: patient.address.clone(),
        patient_relationship,
        insured_name: insurance.subscriber_name.clone(),
        insured_address: patient.address.clone(),
        insured_policy_group: primary.group_number.clone(),
        insurance_plan_name: format!("{} {}", primary.provider, primary.plan_type.code()),
        other_insured,
        condition_related_to,
        date_of_illness: dates.date_of_illness,
        hospitalization: dates.hospitalization,
        unable_to_work: dates.unable_to_work,
        service_date: dates.service_date,
        provider_signature_date: dates.provider_signature_date,
        patient_signature_date: dates.patient_signature_date,
        prior_authorization_number,
        diagnosis_codes,
        service_lines,
        federal_tax_id: provider.tax_id.clone(),
        patient_account_number: patient.account_number.clone(),
        accept_assignment: chance(rng, ACCEPT_ASSIGNMENT_PROBABILITY),
        total_charges,
        amount_paid,
        balance_due,
        rendering_provider: provider.display_name(),
        service_facility,
        billing_provider,
    }
}

#[cfg(test)]
mod tests {
    use mockchart_contracts::{claim::DiagnosisPointer, insurance::Subscriber};

    use super::*;
    use crate::{
        identity::{generate_identity, generate_subscriber},
        insurance::generate_insurance,
        rng::seeded,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()
    }

    fn claim_for(seed: u64, pool: Option<&[String]>, subscriber: bool) -> (Patient, InsuranceInfo, Claim) {
        let mut rng = seeded(seed);
        let identity = generate_identity(&mut rng, today());
        let sub: Option<Subscriber> =
            subscriber.then(|| generate_subscriber(&mut rng, today(), &identity.patient));
        let insurance =
            generate_insurance(&mut rng, today(), true, &identity.patient, sub.as_ref());
        let claim = generate_claim(
            &mut rng,
            today(),
            &identity.patient,
            &identity.provider,
            &insurance,
            &[],
            pool,
        );
        (identity.patient, insurance, claim)
    }

    // ── 1. totals ────────────────────────────────────────────────────────────

    #[test]
    fn test_totals_are_derived() {
        for seed in 0..300 {
            let (_, _, claim) = claim_for(seed, None, false);
            let sum: f64 = claim.service_lines.iter().map(|l| l.charges).sum();
            assert_eq!(claim.total_charges, round_to(sum, 2));
            assert!(claim.amount_paid <= claim.total_charges);
            assert_eq!(claim.balance_due, round_to(claim.total_charges - claim.amount_paid, 2));
        }
    }

    // ── 2. relationship ──────────────────────────────────────────────────────

    #[test]
    fn test_relationship_self_iff_same_name() {
        for seed in 0..200 {
            let (patient, insurance, claim) = claim_for(seed, None, seed % 2 == 0);
            let same = insurance.subscriber_name == patient.full_name();
            assert_eq!(claim.patient_relationship == PatientRelationship::SelfInsured, same);
            if seed % 2 == 1 {
                assert!(same);
            }
        }
    }

    // ── 3. end to end ────────────────────────────────────────────────────────

    #[test]
    fn test_hypertension_and_diabetes_scenario() {
        let pool = vec!["I10".to_string(), "E11.9".to_string()];
        for seed in 0..200 {
            let (_, _, claim) = claim_for(seed, Some(&pool), false);
            assert_eq!(claim.diagnosis_codes, pool);
            assert!(claim.service_lines.iter().any(|l| {
                ["99213", "99214", "99215", "93000"].contains(&l.procedure_code.as_str())
                    && l.diagnosis_pointers.contains(&DiagnosisPointer::A)
            }));
            assert!(claim.service_lines.iter().any(|l| {
                ["83036", "82947"].contains(&l.procedure_code.as_str())
                    && l.diagnosis_pointers.contains(&DiagnosisPointer::B)
            }));
        }
    }

    #[test]
    fn test_other_insured_mirrors_secondary() {
        for seed in 0..200 {
            let (_, insurance, claim) = claim_for(seed, None, false);
            assert_eq!(
                claim.other_insured.is_some(),
                insurance.secondary_insurance.is_some()
            );
            assert_eq!(claim.insured_id, insurance.primary_insurance.member_id);
        }
    }

    #[test]
    fn test_accident_state_only_with_auto_accident() {
        for seed in 0..500 {
            let (patient, _, claim) = claim_for(seed, None, false);
            let related = &claim.condition_related_to;
            assert_eq!(related.accident_state.is_some(), related.auto_accident);
            if let Some(state) = &related.accident_state {
                assert_eq!(state, &patient.address.state);
            }
        }
    }
}
