//! Primary and optional secondary insurance.

use chrono::{Datelike, NaiveDate};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use rand::Rng;
use tracing::{debug, warn};

use mockchart_contracts::{
    insurance::{Insurance, InsuranceInfo, PlanType, Subscriber},
    patient::Patient,
};

use crate::rng::{chance, digits, letters, pick};

/// Payer vocabulary shared by primary and secondary selection.
pub const PAYERS: &[&str] = &[
    "Aetna",
    "Blue Cross Blue Shield",
    "Cigna",
    "UnitedHealthcare",
    "Humana",
    "Kaiser Permanente",
    "Anthem",
    "Medicare",
    "Medicaid",
    "Molina Healthcare",
];

/// Government payers never carry an employer-sponsored subscriber.
const GOVERNMENT_PAYERS: &[&str] = &["Medicare", "Medicaid"];

const SECONDARY_PROBABILITY: f64 = 0.3;

const COPAYS: &[f64] = &[0.0, 10.0, 20.0, 25.0, 30.0, 40.0, 50.0];
const DEDUCTIBLES: &[f64] = &[250.0, 500.0, 1000.0, 1500.0, 2000.0, 3000.0, 5000.0];

/// Generate coverage for `patient`.
///
/// The primary policy is always produced. A secondary policy is produced
/// only when `include_secondary` is set and a 30% coin succeeds; its payer
/// is drawn from the vocabulary with the primary payer filtered out. The
/// subscriber is the patient unless a distinct `subscriber` is supplied.
pub fn generate_insurance<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    include_secondary: bool,
    patient: &Patient,
    subscriber: Option<&Subscriber>,
) -> InsuranceInfo {
    let primary_payer = *pick(rng, PAYERS);
    let primary = generate_policy(rng, today, primary_payer);

    let secondary = if include_secondary && chance(rng, SECONDARY_PROBABILITY) {
        let candidates: Vec<&str> = PAYERS
            .iter()
            .copied()
            .filter(|p| *p != primary.provider)
            .collect();
        if candidates.is_empty() {
            warn!(primary = %primary.provider, "no alternative payer for secondary coverage");
            None
        } else {
            let payer = *pick(rng, &candidates);
            Some(generate_policy(rng, today, payer))
        }
    } else {
        None
    };

    let (subscriber_name, subscriber_date_of_birth, subscriber_gender) = match subscriber {
        Some(s) => (s.full_name(), s.date_of_birth, s.gender),
        None => (patient.full_name(), patient.date_of_birth, patient.gender),
    };

    let subscriber_employer = if GOVERNMENT_PAYERS.contains(&primary.provider.as_str()) {
        None
    } else if chance(rng, 0.7) {
        Some(CompanyName().fake_with_rng::<String, _>(rng))
    } else {
        None
    };

    debug!(
        primary = %primary.provider,
        secondary = secondary.as_ref().map(|s| s.provider.as_str()).unwrap_or("none"),
        "insurance generated"
    );

    InsuranceInfo {
        primary_insurance: primary,
        secondary_insurance: secondary,
        subscriber_name,
        subscriber_date_of_birth,
        subscriber_gender,
        subscriber_employer,
    }
}

fn generate_policy<R: Rng>(rng: &mut R, today: NaiveDate, provider: &str) -> Insurance {
    let prefix: String = provider
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .collect::<String>()
        .to_uppercase();

    // Plans renew on January 1st; coverage began this year or up to five back.
    let start_year = today.year() - rng.random_range(0..=5);
    let effective_date = NaiveDate::from_ymd_opt(start_year, 1, 1).unwrap_or(today);

    Insurance {
        provider: provider.to_string(),
        plan_type: *pick(rng, &PlanType::ALL),
        policy_number: format!("{prefix}{}", digits(rng, 9)),
        group_number: format!("GRP{}", digits(rng, 6)),
        member_id: format!("{}{}", letters(rng, 3), digits(rng, 9)),
        payer_phone: format!("1-800-{}-{}", digits(rng, 3), digits(rng, 4)),
        effective_date,
        copay: *pick(rng, COPAYS),
        deductible: *pick(rng, DEDUCTIBLES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{identity::generate_patient, rng::seeded};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 20).unwrap()
    }

    #[test]
    fn test_no_secondary_unless_requested() {
        let mut rng = seeded(1);
        for _ in 0..200 {
            let patient = generate_patient(&mut rng, today());
            let info = generate_insurance(&mut rng, today(), false, &patient, None);
            assert!(info.secondary_insurance.is_none());
        }
    }

    #[test]
    fn test_secondary_payer_differs_from_primary() {
        let mut rng = seeded(2);
        let mut produced = 0;
        for _ in 0..400 {
            let patient = generate_patient(&mut rng, today());
            let info = generate_insurance(&mut rng, today(), true, &patient, None);
            if let Some(secondary) = &info.secondary_insurance {
                produced += 1;
                assert_ne!(secondary.provider, info.primary_insurance.provider);
            }
        }
        // Roughly 30% of 400.
        assert!(produced > 80 && produced < 170, "produced {produced}");
    }

    #[test]
    fn test_subscriber_defaults_to_patient() {
        let mut rng = seeded(3);
        let patient = generate_patient(&mut rng, today());
        let info = generate_insurance(&mut rng, today(), false, &patient, None);
        assert_eq!(info.subscriber_name, patient.full_name());
        assert_eq!(info.subscriber_date_of_birth, patient.date_of_birth);
    }

    #[test]
    fn test_distinct_subscriber_is_used() {
        let mut rng = seeded(4);
        let patient = generate_patient(&mut rng, today());
        let subscriber = crate::identity::generate_subscriber(&mut rng, today(), &patient);
        let info = generate_insurance(&mut rng, today(), false, &patient, Some(&subscriber));
        assert_eq!(info.subscriber_name, subscriber.full_name());
        assert_ne!(info.subscriber_name, patient.full_name());
    }

    #[test]
    fn test_effective_date_not_in_future() {
        let mut rng = seeded(5);
        for _ in 0..100 {
            let patient = generate_patient(&mut rng, today());
            let info = generate_insurance(&mut rng, today(), true, &patient, None);
            assert!(info.primary_insurance.effective_date <= today());
        }
    }
}
