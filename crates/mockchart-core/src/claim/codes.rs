//! ICD-10 diagnosis vocabulary and selection.
//!
//! Selection returns 2 to 4 distinct codes. Their order defines the pointer
//! letters and is never changed afterwards.

use rand::{seq::IndexedRandom, Rng};
use tracing::warn;

use mockchart_contracts::{
    claim::is_icd10_code,
    history::{ChronicCondition, ConditionKind},
};

pub const MIN_DIAGNOSES: usize = 2;
pub const MAX_DIAGNOSES: usize = 4;

/// Acute and critical diagnoses billed alongside the chronic list.
const ACUTE_DIAGNOSES: &[(&str, &str)] = &[
    ("J06.9", "Acute upper respiratory infection, unspecified"),
    ("J02.9", "Acute pharyngitis, unspecified"),
    ("J18.9", "Pneumonia, unspecified organism"),
    ("N39.0", "Urinary tract infection, site not specified"),
    ("R07.9", "Chest pain, unspecified"),
    ("I21.9", "Acute myocardial infarction, unspecified"),
    ("R10.9", "Unspecified abdominal pain"),
    ("M54.50", "Low back pain, unspecified"),
    ("S93.401A", "Sprain of unspecified ligament of right ankle, initial encounter"),
    ("R51.9", "Headache, unspecified"),
    ("Z12.11", "Encounter for screening for malignant neoplasm of colon"),
    ("A41.9", "Sepsis, unspecified organism"),
    ("I63.9", "Cerebral infarction, unspecified"),
    ("R06.02", "Shortness of breath"),
    ("K57.30", "Diverticulosis of large intestine without perforation or abscess"),
];

/// Every code the generator may bill, chronic conditions first.
pub fn vocabulary() -> Vec<(&'static str, &'static str)> {
    ConditionKind::ALL
        .into_iter()
        .map(|k| (k.icd_code(), k.label()))
        .chain(ACUTE_DIAGNOSES.iter().copied())
        .collect()
}

/// Description for a known code.
pub fn describe(code: &str) -> Option<&'static str> {
    vocabulary()
        .into_iter()
        .find(|(c, _)| *c == code)
        .map(|(_, description)| description)
}

/// Choose the claim's diagnosis codes.
///
/// Pool entries are trimmed and upper-cased; anything that is still not an
/// ICD-10 code is dropped before the rules below apply.
///
/// - A pool of 2 to 4 codes is used as given, in order.
/// - A longer pool is sampled down to 2 to 4 codes.
/// - A pool with fewer than 2 codes is padded from the vocabulary.
/// - Without a pool, the record's chronic-condition codes lead, then the
///   vocabulary fills the remainder.
pub fn select_diagnoses<R: Rng>(
    rng: &mut R,
    pool: Option<&[String]>,
    conditions: &[ChronicCondition],
) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    match pool.filter(|p| !p.is_empty()) {
        Some(pool) => {
            for raw in pool {
                let code = raw.trim().to_ascii_uppercase();
                if is_icd10_code(&code) {
                    push_unique(&mut codes, &code);
                } else {
                    warn!(code = %raw, "dropping malformed diagnosis pool entry");
                }
            }
            if codes.len() > MAX_DIAGNOSES {
                let count = rng.random_range(MIN_DIAGNOSES..=MAX_DIAGNOSES);
                codes = codes.choose_multiple(rng, count).cloned().collect();
            }
            if codes.len() >= MIN_DIAGNOSES {
                return codes;
            }
        }
        None => {
            let target = rng.random_range(MIN_DIAGNOSES..=MAX_DIAGNOSES);
            for condition in conditions.iter().take(target) {
                push_unique(&mut codes, condition.kind.icd_code());
            }
            if codes.len() >= target {
                return codes;
            }
            return pad(rng, codes, target);
        }
    }
    pad(rng, codes, MIN_DIAGNOSES)
}

fn push_unique(codes: &mut Vec<String>, code: &str) {
    if !codes.iter().any(|c| c == code) {
        codes.push(code.to_string());
    }
}

fn pad<R: Rng>(rng: &mut R, mut codes: Vec<String>, target: usize) -> Vec<String> {
    let vocabulary = vocabulary();
    let available: Vec<&str> = vocabulary
        .iter()
        .map(|(code, _)| *code)
        .filter(|code| !codes.iter().any(|c| c == code))
        .collect();
    let missing = target.saturating_sub(codes.len());
    codes.extend(
        available
            .choose_multiple(rng, missing)
            .map(|code| code.to_string()),
    );
    codes
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;
    use mockchart_contracts::history::ConditionStatus;

    use super::*;
    use crate::rng::seeded;

    fn pool(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_short_pool_used_verbatim_in_order() {
        let mut rng = seeded(50);
        let given = pool(&["I10", "E11.9", "J44.9"]);
        assert_eq!(select_diagnoses(&mut rng, Some(&given), &[]), given);
    }

    #[test]
    fn test_long_pool_is_sampled() {
        let mut rng = seeded(51);
        let given = pool(&["I10", "E11.9", "J44.9", "N39.0", "R07.9", "K21.9"]);
        for _ in 0..100 {
            let codes = select_diagnoses(&mut rng, Some(&given), &[]);
            assert!((MIN_DIAGNOSES..=MAX_DIAGNOSES).contains(&codes.len()));
            assert!(codes.iter().all(|c| given.contains(c)));
        }
    }

    #[test]
    fn test_single_code_pool_is_padded() {
        let mut rng = seeded(52);
        let codes = select_diagnoses(&mut rng, Some(&pool(&["I10"])), &[]);
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0], "I10");
        assert_ne!(codes[1], "I10");
    }

    #[test]
    fn test_pool_entries_are_normalized_and_blanks_dropped() {
        let mut rng = seeded(55);
        let given = pool(&["", " i10 ", "e11.9", "not-a-code"]);
        assert_eq!(
            select_diagnoses(&mut rng, Some(&given), &[]),
            pool(&["I10", "E11.9"])
        );
    }

    #[test]
    fn test_pool_of_only_blanks_is_padded_from_vocabulary() {
        let mut rng = seeded(56);
        let codes = select_diagnoses(&mut rng, Some(&pool(&["", "  "])), &[]);
        assert_eq!(codes.len(), MIN_DIAGNOSES);
        assert!(codes.iter().all(|c| is_icd10_code(c)));
    }

    #[test]
    fn test_conditions_lead_without_pool() {
        let mut rng = seeded(53);
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let conditions = vec![
            ChronicCondition::new(ConditionKind::Gerd, date, ConditionStatus::Active),
            ChronicCondition::new(ConditionKind::Asthma, date, ConditionStatus::Active),
        ];
        for _ in 0..50 {
            let codes = select_diagnoses(&mut rng, None, &conditions);
            assert_eq!(&codes[..2], &["K21.9".to_string(), "J45.909".to_string()]);
            assert!(codes.len() <= MAX_DIAGNOSES);
        }
    }

    #[test]
    fn test_codes_are_distinct_and_known() {
        let mut rng = seeded(54);
        for _ in 0..300 {
            let codes = select_diagnoses(&mut rng, None, &[]);
            assert!((MIN_DIAGNOSES..=MAX_DIAGNOSES).contains(&codes.len()));
            let unique: HashSet<&String> = codes.iter().collect();
            assert_eq!(unique.len(), codes.len());
            assert!(codes.iter().all(|c| describe(c).is_some()));
        }
    }
}
