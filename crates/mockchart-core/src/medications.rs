//! Medication correlator.
//!
//! Each chronic condition maps to a table of candidate drugs. One unused
//! candidate is chosen per condition and its `purpose` is the table's purpose
//! text for that condition. Remaining slots up to the complexity target are
//! filled from a supplement pool, bounded by a hard attempt cap.

use std::collections::HashSet;

use chrono::NaiveDate;
use rand::{seq::IndexedRandom, Rng};
use tracing::{debug, warn};

use mockchart_contracts::{
    history::{ChronicCondition, ConditionKind},
    medication::{CurrentMedication, DiscontinuedMedication, Medications},
    record::Complexity,
};

use crate::rng::{date_between, days_before, pick};

/// Upper bound on filler draws, whatever the pool size.
pub const MAX_FILL_ATTEMPTS: usize = 25;

#[derive(Debug, Clone, Copy)]
pub struct DrugEntry {
    pub name: &'static str,
    pub dosage: &'static str,
    pub frequency: &'static str,
    pub route: &'static str,
}

const fn drug(
    name: &'static str,
    dosage: &'static str,
    frequency: &'static str,
    route: &'static str,
) -> DrugEntry {
    DrugEntry {
        name,
        dosage,
        frequency,
        route,
    }
}

const HYPERTENSION_DRUGS: &[DrugEntry] = &[
    drug("Lisinopril", "10 mg", "Once daily", "Oral"),
    drug("Amlodipine", "5 mg", "Once daily", "Oral"),
    drug("Losartan", "50 mg", "Once daily", "Oral"),
    drug("Hydrochlorothiazide", "25 mg", "Once daily", "Oral"),
];

const TYPE2_DIABETES_DRUGS: &[DrugEntry] = &[
    drug("Metformin", "500 mg", "Twice daily with meals", "Oral"),
    drug("Glipizide", "5 mg", "Once daily before breakfast", "Oral"),
    drug("Sitagliptin", "100 mg", "Once daily", "Oral"),
    drug("Empagliflozin", "10 mg", "Once daily", "Oral"),
];

const HYPERLIPIDEMIA_DRUGS: &[DrugEntry] = &[
    drug("Atorvastatin", "20 mg", "Once daily at bedtime", "Oral"),
    drug("Rosuvastatin", "10 mg", "Once daily", "Oral"),
    drug("Simvastatin", "40 mg", "Once daily at bedtime", "Oral"),
];

const COPD_DRUGS: &[DrugEntry] = &[
    drug("Tiotropium", "18 mcg", "One inhalation daily", "Inhaled"),
    drug("Albuterol HFA", "90 mcg", "2 puffs every 4-6 hours as needed", "Inhaled"),
    drug("Fluticasone/Salmeterol", "250/50 mcg", "One inhalation twice daily", "Inhaled"),
];

const ASTHMA_DRUGS: &[DrugEntry] = &[
    drug("Albuterol HFA", "90 mcg", "2 puffs every 4-6 hours as needed", "Inhaled"),
    drug("Montelukast", "10 mg", "Once daily at bedtime", "Oral"),
    drug("Budesonide/Formoterol", "160/4.5 mcg", "2 puffs twice daily", "Inhaled"),
];

const CHRONIC_KIDNEY_DISEASE_DRUGS: &[DrugEntry] = &[
    drug("Losartan", "25 mg", "Once daily", "Oral"),
    drug("Sodium Bicarbonate", "650 mg", "Twice daily", "Oral"),
    drug("Calcitriol", "0.25 mcg", "Once daily", "Oral"),
];

const CORONARY_ARTERY_DISEASE_DRUGS: &[DrugEntry] = &[
    drug("Aspirin", "81 mg", "Once daily", "Oral"),
    drug("Metoprolol Succinate", "50 mg", "Once daily", "Oral"),
    drug("Clopidogrel", "75 mg", "Once daily", "Oral"),
    drug("Nitroglycerin", "0.4 mg", "As needed for chest pain", "Sublingual"),
];

const HEART_FAILURE_DRUGS: &[DrugEntry] = &[
    drug("Furosemide", "40 mg", "Once daily", "Oral"),
    drug("Carvedilol", "12.5 mg", "Twice daily", "Oral"),
    drug("Spironolactone", "25 mg", "Once daily", "Oral"),
    drug("Sacubitril/Valsartan", "49/51 mg", "Twice daily", "Oral"),
];

const ATRIAL_FIBRILLATION_DRUGS: &[DrugEntry] = &[
    drug("Apixaban", "5 mg", "Twice daily", "Oral"),
    drug("Diltiazem ER", "120 mg", "Once daily", "Oral"),
    drug("Metoprolol Tartrate", "25 mg", "Twice daily", "Oral"),
];

const HYPOTHYROIDISM_DRUGS: &[DrugEntry] = &[
    drug("Levothyroxine", "75 mcg", "Once daily before breakfast", "Oral"),
];

const DEPRESSION_DRUGS: &[DrugEntry] = &[
    drug("Sertraline", "50 mg", "Once daily", "Oral"),
    drug("Escitalopram", "10 mg", "Once daily", "Oral"),
    drug("Bupropion XL", "150 mg", "Once daily", "Oral"),
];

const ANXIETY_DRUGS: &[DrugEntry] = &[
    drug("Buspirone", "10 mg", "Twice daily", "Oral"),
    drug("Escitalopram", "10 mg", "Once daily", "Oral"),
    drug("Hydroxyzine", "25 mg", "As needed for anxiety", "Oral"),
];

const OSTEOARTHRITIS_DRUGS: &[DrugEntry] = &[
    drug("Meloxicam", "15 mg", "Once daily", "Oral"),
    drug("Celecoxib", "200 mg", "Once daily", "Oral"),
    drug("Diclofenac Gel", "1%", "Apply four times daily", "Topical"),
];

const GERD_DRUGS: &[DrugEntry] = &[
    drug("Omeprazole", "20 mg", "Once daily before breakfast", "Oral"),
    drug("Pantoprazole", "40 mg", "Once daily", "Oral"),
    drug("Famotidine", "20 mg", "Twice daily", "Oral"),
];

const MIGRAINE_DRUGS: &[DrugEntry] = &[
    drug("Sumatriptan", "50 mg", "At migraine onset, may repeat once", "Oral"),
    drug("Topiramate", "25 mg", "Twice daily", "Oral"),
    drug("Propranolol", "40 mg", "Twice daily", "Oral"),
];

/// Candidate drugs and purpose text for a condition.
///
/// Returns `None` for conditions with no table entry; those are skipped.
pub fn condition_drugs(kind: ConditionKind) -> Option<(&'static [DrugEntry], &'static str)> {
    let entry = match kind {
        ConditionKind::Hypertension => (HYPERTENSION_DRUGS, "Hypertension - blood pressure control"),
        ConditionKind::Type2Diabetes => (TYPE2_DIABETES_DRUGS, "Type 2 diabetes - glycemic control"),
        ConditionKind::Hyperlipidemia => (HYPERLIPIDEMIA_DRUGS, "Hyperlipidemia - cholesterol management"),
        ConditionKind::Copd => (COPD_DRUGS, "COPD - bronchodilator maintenance"),
        ConditionKind::Asthma => (ASTHMA_DRUGS, "Asthma - symptom control"),
        ConditionKind::ChronicKidneyDisease => (CHRONIC_KIDNEY_DISEASE_DRUGS, "Chronic kidney disease - renal protection"),
        ConditionKind::CoronaryArteryDisease => (CORONARY_ARTERY_DISEASE_DRUGS, "Coronary artery disease - secondary prevention"),
        ConditionKind::HeartFailure => (HEART_FAILURE_DRUGS, "Heart failure - fluid and symptom management"),
        ConditionKind::AtrialFibrillation => (ATRIAL_FIBRILLATION_DRUGS, "Atrial fibrillation - rate control and stroke prevention"),
        ConditionKind::Hypothyroidism => (HYPOTHYROIDISM_DRUGS, "Hypothyroidism - thyroid hormone replacement"),
        ConditionKind::Depression => (DEPRESSION_DRUGS, "Depression - mood stabilization"),
        ConditionKind::Anxiety => (ANXIETY_DRUGS, "Anxiety - symptom management"),
        ConditionKind::Osteoarthritis => (OSTEOARTHRITIS_DRUGS, "Osteoarthritis - joint pain relief"),
        ConditionKind::Gerd => (GERD_DRUGS, "GERD - acid suppression"),
        ConditionKind::Migraine => (MIGRAINE_DRUGS, "Migraine - headache prevention"),
        ConditionKind::Obesity => return None,
    };
    Some(entry)
}

/// Filler pool: `(entry, purpose)`.
const SUPPLEMENTS: &[(DrugEntry, &'static str)] = &[
    (drug("Multivitamin", "1 tablet", "Once daily", "Oral"), "General health supplement"),
    (drug("Vitamin D3", "2000 IU", "Once daily", "Oral"), "Vitamin D supplementation"),
    (drug("Aspirin", "81 mg", "Once daily", "Oral"), "Cardiovascular prevention"),
    (drug("Fish Oil", "1000 mg", "Once daily", "Oral"), "General health supplement"),
    (drug("Calcium Carbonate + Vitamin D", "600 mg/400 IU", "Twice daily", "Oral"), "Bone health"),
    (drug("Probiotic", "1 capsule", "Once daily", "Oral"), "Digestive health"),
    (drug("Melatonin", "3 mg", "At bedtime as needed", "Oral"), "Sleep aid"),
    (drug("Loratadine", "10 mg", "Once daily as needed", "Oral"), "Seasonal allergies"),
    (drug("Acetaminophen", "500 mg", "Every 6 hours as needed", "Oral"), "Pain relief as needed"),
    (drug("Magnesium Oxide", "400 mg", "Once daily", "Oral"), "Mineral supplementation"),
    (drug("Vitamin B12", "1000 mcg", "Once daily", "Oral"), "Vitamin B12 supplementation"),
    (drug("Docusate Sodium", "100 mg", "Once daily as needed", "Oral"), "Constipation"),
];

const DISCONTINUED_POOL: &[(&str, &str)] = &[
    ("Ibuprofen", "600 mg"),
    ("Prednisone", "20 mg"),
    ("Amoxicillin", "500 mg"),
    ("Hydrocodone/Acetaminophen", "5/325 mg"),
    ("Gabapentin", "300 mg"),
    ("Cyclobenzaprine", "10 mg"),
    ("Ciprofloxacin", "500 mg"),
    ("Lorazepam", "0.5 mg"),
    ("Pravastatin", "40 mg"),
    ("Glyburide", "5 mg"),
    ("Atenolol", "50 mg"),
    ("Paroxetine", "20 mg"),
];

const DISCONTINUE_REASONS: &[&str] = &[
    "Side effects",
    "Ineffective",
    "Course completed",
    "Switched to alternative therapy",
    "Allergic reaction",
    "Cost",
    "Patient preference",
];

/// Build current and discontinued medications for a problem list.
///
/// `prescriber` is recorded on every current medication.
pub fn generate_medications<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    complexity: Complexity,
    conditions: &[ChronicCondition],
    prescriber: &str,
) -> Medications {
    let target = complexity.medication_target();
    let mut used: HashSet<&'static str> = HashSet::new();
    let mut current: Vec<CurrentMedication> = Vec::new();

    // ── Condition-driven ─────────────────────────────────────────────────────
    for condition in conditions {
        let Some((candidates, purpose)) = condition_drugs(condition.kind) else {
            debug!(condition = ?condition.kind, "no drug table entry; skipping");
            continue;
        };
        let available: Vec<&DrugEntry> =
            candidates.iter().filter(|d| !used.contains(d.name)).collect();
        let Some(entry) = available.choose(rng).copied() else {
            continue;
        };
        used.insert(entry.name);
        let start_date = date_between(rng, condition.diagnosed_date, today);
        current.push(current_medication(
            rng,
            entry,
            purpose,
            Some(condition.kind),
            prescriber,
            start_date,
        ));
    }

    // ── Filler ───────────────────────────────────────────────────────────────
    fill_from_pool(
        rng,
        SUPPLEMENTS,
        target,
        &mut used,
        &mut current,
        today,
        prescriber,
    );

    let discontinued = generate_discontinued(rng, today, complexity, &used);
    debug!(
        current = current.len(),
        discontinued = discontinued.len(),
        target,
        "medications generated"
    );
    Medications {
        current,
        discontinued,
    }
}

/// Draw unused entries from `pool` until `current` reaches `target`.
///
/// Stops early when the pool runs dry or after `MAX_FILL_ATTEMPTS` draws.
fn fill_from_pool<R: Rng>(
    rng: &mut R,
    pool: &[(DrugEntry, &'static str)],
    target: usize,
    used: &mut HashSet<&'static str>,
    current: &mut Vec<CurrentMedication>,
    today: NaiveDate,
    prescriber: &str,
) {
    let mut remaining: Vec<&(DrugEntry, &'static str)> =
        pool.iter().filter(|(d, _)| !used.contains(d.name)).collect();
    let mut attempts = 0;
    while current.len() < target {
        if attempts >= MAX_FILL_ATTEMPTS {
            warn!(
                have = current.len(),
                target, attempts, "filler attempt cap reached before medication target"
            );
            break;
        }
        attempts += 1;
        if remaining.is_empty() {
            warn!(
                have = current.len(),
                target, "supplement pool exhausted before reaching medication target"
            );
            break;
        }
        let (entry, purpose) = *remaining.swap_remove(rng.random_range(0..remaining.len()));
        if !used.insert(entry.name) {
            continue;
        }
        let start_date = days_before(rng, today, 30, 5 * 365);
        current.push(current_medication(rng, &entry, purpose, None, prescriber, start_date));
    }
}

fn current_medication<R: Rng>(
    rng: &mut R,
    entry: &DrugEntry,
    purpose: &str,
    indication: Option<ConditionKind>,
    prescriber: &str,
    start_date: NaiveDate,
) -> CurrentMedication {
    CurrentMedication {
        name: entry.name.to_string(),
        dosage: entry.dosage.to_string(),
        frequency: entry.frequency.to_string(),
        route: entry.route.to_string(),
        purpose: purpose.to_string(),
        indication,
        prescriber: prescriber.to_string(),
        start_date,
        refills_remaining: rng.random_range(0..=5),
    }
}

/// Past medications, sampled independently of the current conditions.
fn generate_discontinued<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    complexity: Complexity,
    current_names: &HashSet<&'static str>,
) -> Vec<DiscontinuedMedication> {
    let count = match complexity {
        Complexity::Low => rng.random_range(0..=1),
        Complexity::Medium => rng.random_range(1..=2),
        Complexity::High => rng.random_range(1..=3),
    };
    let available: Vec<&(&str, &str)> = DISCONTINUED_POOL
        .iter()
        .filter(|(name, _)| !current_names.contains(name))
        .collect();
    let chosen: Vec<&(&str, &str)> = available.choose_multiple(rng, count).copied().collect();
    chosen
        .into_iter()
        .map(|(name, dosage)| {
            let start_date = days_before(rng, today, 200, 5 * 365);
            let elapsed = (today - start_date).num_days();
            let stop_date = crate::rng::days_after(rng, start_date, 14, elapsed - 7);
            DiscontinuedMedication {
                name: name.to_string(),
                dosage: dosage.to_string(),
                start_date,
                stop_date,
                reason: pick(rng, DISCONTINUE_REASONS).to_string(),
            }
        })
        .collect()
}
