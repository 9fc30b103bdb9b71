//! Medical history generation.
//!
//! The chronic-condition list produced here is the pivot every downstream
//! correlator reads.

use chrono::NaiveDate;
use fake::faker::address::en::CityName;
use fake::Fake;
use rand::{seq::IndexedRandom, Rng};
use tracing::debug;

use mockchart_contracts::{
    history::{
        Allergy, AllergySeverity, ChronicCondition, ConditionKind, ConditionStatus,
        FamilyHistory, MedicalHistory, SocialHistory, SurgicalHistory, TobaccoUse,
    },
    record::Complexity,
};

use crate::rng::{chance, days_before, pick, pick_weighted};

const ALLERGY_PROBABILITY: f64 = 0.6;

const ALLERGENS: &[(&str, &str)] = &[
    ("Penicillin", "Hives"),
    ("Sulfa drugs", "Rash"),
    ("Codeine", "Nausea and vomiting"),
    ("Latex", "Contact dermatitis"),
    ("Peanuts", "Anaphylaxis"),
    ("Shellfish", "Facial swelling"),
    ("Aspirin", "Bronchospasm"),
    ("Iodinated contrast", "Hives"),
    ("Bee stings", "Localized swelling"),
    ("Amoxicillin", "Rash"),
    ("Morphine", "Pruritus"),
    ("Eggs", "GI upset"),
];

const SEVERITIES: &[(AllergySeverity, u32)] = &[
    (AllergySeverity::Mild, 50),
    (AllergySeverity::Moderate, 35),
    (AllergySeverity::Severe, 15),
];

const STATUSES: &[(ConditionStatus, u32)] = &[
    (ConditionStatus::Active, 40),
    (ConditionStatus::Controlled, 35),
    (ConditionStatus::Managed, 25),
];

const SURGERIES: &[&str] = &[
    "Appendectomy",
    "Laparoscopic Cholecystectomy",
    "Tonsillectomy",
    "Knee Arthroscopy",
    "Cataract Extraction",
    "Inguinal Hernia Repair",
    "Carpal Tunnel Release",
    "Coronary Angioplasty with Stent",
    "Total Hip Replacement",
    "Colonoscopy with Polypectomy",
    "Rotator Cuff Repair",
];

const SURGICAL_NOTES: &[&str] = &[
    "Uncomplicated recovery",
    "Discharged post-op day 1",
    "Outpatient procedure",
    "No complications reported",
    "Required brief physical therapy",
];

const FAMILY_RELATIONS: &[&str] = &[
    "Mother",
    "Father",
    "Brother",
    "Sister",
    "Maternal Grandmother",
    "Maternal Grandfather",
    "Paternal Grandmother",
    "Paternal Grandfather",
];

const FAMILY_CONDITIONS: &[&str] = &[
    "Hypertension",
    "Type 2 Diabetes",
    "Coronary Artery Disease",
    "Breast Cancer",
    "Colon Cancer",
    "Stroke",
    "Alzheimer's Disease",
    "Hyperlipidemia",
];

const ALCOHOL: &[&str] = &[
    "None",
    "Occasional (1-2 drinks/week)",
    "Moderate (3-7 drinks/week)",
    "Social only",
];

const EXERCISE: &[&str] = &[
    "Sedentary",
    "Walks 2-3 times per week",
    "Moderate exercise 3-4 times per week",
    "Daily exercise",
];

/// Generate a history whose size scales with `complexity`.
pub fn generate_history<R: Rng>(rng: &mut R, today: NaiveDate, complexity: Complexity) -> MedicalHistory {
    let chronic_conditions = generate_conditions(rng, today, complexity.condition_count());
    let has_copd = chronic_conditions.iter().any(|c| c.kind == ConditionKind::Copd);

    let history = MedicalHistory {
        allergies: generate_allergies(rng),
        chronic_conditions,
        surgical_history: generate_surgeries(rng, today, complexity),
        family_history: generate_family(rng, complexity),
        social_history: generate_social(rng, has_copd),
    };
    debug!(
        ?complexity,
        conditions = history.chronic_conditions.len(),
        allergies = history.allergies.as_ref().map_or(0, Vec::len),
        "medical history generated"
    );
    history
}

/// `count` distinct conditions, each diagnosed one to fifteen years ago.
pub fn generate_conditions<R: Rng>(rng: &mut R, today: NaiveDate, count: usize) -> Vec<ChronicCondition> {
    let kinds: Vec<ConditionKind> = ConditionKind::ALL
        .choose_multiple(rng, count)
        .copied()
        .collect();
    kinds
        .into_iter()
        .map(|kind| {
            let diagnosed = days_before(rng, today, 365, 15 * 365);
            ChronicCondition::new(kind, diagnosed, pick_weighted(rng, STATUSES))
        })
        .collect()
}

fn generate_allergies<R: Rng>(rng: &mut R) -> Option<Vec<Allergy>> {
    if !chance(rng, ALLERGY_PROBABILITY) {
        return None;
    }
    let count = rng.random_range(1..=3);
    let picked: Vec<&(&str, &str)> = ALLERGENS.choose_multiple(rng, count).collect();
    Some(
        picked
            .into_iter()
            .map(|(allergen, reaction)| Allergy {
                allergen: allergen.to_string(),
                reaction: reaction.to_string(),
                severity: pick_weighted(rng, SEVERITIES),
            })
            .collect(),
    )
}

fn generate_surgeries<R: Rng>(rng: &mut R, today: NaiveDate, complexity: Complexity) -> Vec<SurgicalHistory> {
    let count = match complexity {
        Complexity::Low => rng.random_range(0..=1),
        Complexity::Medium => rng.random_range(1..=2),
        Complexity::High => rng.random_range(2..=4),
    };
    let procedures: Vec<&str> = SURGERIES.choose_multiple(rng, count).copied().collect();
    let mut surgeries: Vec<SurgicalHistory> = procedures
        .into_iter()
        .map(|procedure| {
            let city: String = CityName().fake_with_rng(rng);
            SurgicalHistory {
                procedure: procedure.to_string(),
                date: days_before(rng, today, 180, 20 * 365),
                hospital: format!("{city} General Hospital"),
                notes: pick(rng, SURGICAL_NOTES).to_string(),
            }
        })
        .collect();
    surgeries.sort_by_key(|s| s.date);
    surgeries
}

fn generate_family<R: Rng>(rng: &mut R, complexity: Complexity) -> Vec<FamilyHistory> {
    let count = match complexity {
        Complexity::Low => rng.random_range(1..=2),
        Complexity::Medium => rng.random_range(2..=3),
        Complexity::High => rng.random_range(3..=5),
    };
    // Distinct (relation, condition) pairs.
    let pairs: Vec<(&str, &str)> = FAMILY_RELATIONS
        .iter()
        .flat_map(|r| FAMILY_CONDITIONS.iter().map(move |c| (*r, *c)))
        .collect();
    let chosen: Vec<(&str, &str)> = pairs.choose_multiple(rng, count).copied().collect();
    chosen
        .into_iter()
        .map(|(relation, condition)| FamilyHistory {
            relation: relation.to_string(),
            condition: condition.to_string(),
            age_at_diagnosis: chance(rng, 0.7).then(|| rng.random_range(40..=80)),
            deceased: chance(rng, 0.2),
        })
        .collect()
}

fn generate_social<R: Rng>(rng: &mut R, has_copd: bool) -> SocialHistory {
    let weights: &[(TobaccoUse, u32)] = if has_copd {
        &[
            (TobaccoUse::Never, 10),
            (TobaccoUse::Former, 55),
            (TobaccoUse::Current, 35),
        ]
    } else {
        &[
            (TobaccoUse::Never, 65),
            (TobaccoUse::Former, 25),
            (TobaccoUse::Current, 10),
        ]
    };
    let tobacco = pick_weighted(rng, weights);
    let pack_years = (tobacco != TobaccoUse::Never).then(|| rng.random_range(5..=40));
    SocialHistory {
        tobacco,
        pack_years,
        alcohol: pick(rng, ALCOHOL).to_string(),
        exercise: pick(rng, EXERCISE).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::rng::seeded;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    #[test]
    fn test_condition_count_scales_with_complexity() {
        let mut rng = seeded(10);
        for (complexity, expected) in [
            (Complexity::Low, 2),
            (Complexity::Medium, 4),
            (Complexity::High, 6),
        ] {
            let history = generate_history(&mut rng, today(), complexity);
            assert_eq!(history.chronic_conditions.len(), expected);
            let kinds: HashSet<ConditionKind> =
                history.chronic_conditions.iter().map(|c| c.kind).collect();
            assert_eq!(kinds.len(), expected, "conditions must be distinct");
        }
    }

    #[test]
    fn test_allergies_absent_or_one_to_three() {
        let mut rng = seeded(12);
        let mut with_allergies = 0;
        for _ in 0..500 {
            match generate_history(&mut rng, today(), Complexity::Low).allergies {
                None => {}
                Some(list) => {
                    with_allergies += 1;
                    assert!((1..=3).contains(&list.len()));
                    let names: HashSet<&str> = list.iter().map(|a| a.allergen.as_str()).collect();
                    assert_eq!(names.len(), list.len());
                }
            }
        }
        // About 60% of patients have allergies.
        assert!(with_allergies > 250 && with_allergies < 350, "{with_allergies}");
    }

    #[test]
    fn test_surgeries_sorted_and_in_past() {
        let mut rng = seeded(14);
        for _ in 0..50 {
            let history = generate_history(&mut rng, today(), Complexity::High);
            assert!((2..=4).contains(&history.surgical_history.len()));
            for pair in history.surgical_history.windows(2) {
                assert!(pair[0].date <= pair[1].date);
            }
            assert!(history.surgical_history.iter().all(|s| s.date < today()));
        }
    }

    #[test]
    fn test_pack_years_only_for_smokers() {
        let mut rng = seeded(15);
        for _ in 0..200 {
            let social = generate_social(&mut rng, false);
            assert_eq!(social.pack_years.is_some(), social.tobacco != TobaccoUse::Never);
        }
    }

    #[test]
    fn test_copd_skews_toward_smoking() {
        let mut rng = seeded(16);
        let never = (0..1000)
            .filter(|_| generate_social(&mut rng, true).tobacco == TobaccoUse::Never)
            .count();
        assert!(never < 200, "never-smokers with COPD: {never}");
    }
}
