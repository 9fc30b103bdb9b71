//! The generation facade.
//!
//! [`ChartGenerator`] owns the seeded random source and the clock, and
//! exposes the four entry points presentation code calls: full records,
//! claims, single lab panels and single visits. Record assembly runs in a
//! fixed order so a seed always replays to the same record:
//!
//!   id → identity → subscriber → insurance → history → medications
//!      → vitals → labs → visits
//!
//! Every downstream stage reads the problem list produced by the history
//! stage and never modifies it.

use chrono::{Duration, NaiveDate};
use rand::{rngs::StdRng, Rng};
use tracing::{debug, info};

use mockchart_contracts::{
    claim::Claim,
    clinical::{LabReport, LabTestType, VisitReport},
    error::MockchartResult,
    record::{GenerationOptions, Record},
};

use crate::{
    claim,
    conditions::ConditionFlags,
    history::generate_history,
    identity::{generate_identity, generate_subscriber},
    insurance::generate_insurance,
    labs::{generate_lab_report, generate_labs},
    medications::generate_medications,
    rng::{days_before, entropy_seed, seeded, uuid},
    traits::{Clock, SystemClock},
    visit::generate_visit,
    vitals::{generate_vitals, Body},
};

/// Seeded record generator.
///
/// Two generators built with the same seed and the same clock produce
/// identical output for the same sequence of calls.
pub struct ChartGenerator {
    rng: StdRng,
    clock: Box<dyn Clock>,
    seed: u64,
}

impl ChartGenerator {
    pub fn new(seed: u64, clock: Box<dyn Clock>) -> Self {
        Self {
            rng: seeded(seed),
            clock,
            seed,
        }
    }

    /// Seeded generator reading today's date from the system.
    pub fn seeded(seed: u64) -> Self {
        Self::new(seed, Box::new(SystemClock))
    }

    /// Generator with a fresh seed. The seed is logged so the run can be
    /// replayed with [`ChartGenerator::seeded`].
    pub fn from_entropy(clock: Box<dyn Clock>) -> Self {
        let seed = entropy_seed();
        info!(seed, "generator seeded from entropy");
        Self::new(seed, clock)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Assemble a complete record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOptions` when a count exceeds its supported maximum.
    pub fn generate_record(&mut self, options: &GenerationOptions) -> MockchartResult<Record> {
        options.validate()?;
        let today = self.clock.today();
        let rng = &mut self.rng;

        debug!(
            seed = self.seed,
            %today,
            complexity = ?options.complexity,
            visits = options.visit_count,
            labs = options.lab_test_count,
            "record generation starting"
        );

        // ── Step 1: Identity and coverage ────────────────────────────────────
        let record_id = uuid(rng);
        let identity = generate_identity(rng, today);
        let subscriber = options
            .distinct_subscriber
            .then(|| generate_subscriber(rng, today, &identity.patient));
        let insurance = generate_insurance(
            rng,
            today,
            options.include_secondary_insurance,
            &identity.patient,
            subscriber.as_ref(),
        );

        // ── Step 2: History, the pivot every later stage reads ───────────────
        let medical_history = generate_history(rng, today, options.complexity);
        let conditions = &medical_history.chronic_conditions;
        let prescriber = identity.provider.display_name();
        let medications =
            generate_medications(rng, today, options.complexity, conditions, &prescriber);

        // ── Step 3: Correlated measurements ──────────────────────────────────
        let flags = ConditionFlags::from_conditions(conditions);
        let body = Body::sample(rng, identity.patient.gender, flags.obesity);
        let vitals = generate_vitals(rng, today, options.visit_count, conditions, &body);
        let labs = generate_labs(rng, today, options.lab_test_count, conditions, &prescriber);

        // ── Step 4: Visits, one per vitals date ──────────────────────────────
        let visits: Vec<VisitReport> = vitals
            .iter()
            .map(|v| generate_visit(rng, v.recorded_on, conditions, &body, &prescriber))
            .collect();

        debug!(
            record_id = %record_id,
            conditions = conditions.len(),
            medications = medications.current.len(),
            vitals = vitals.len(),
            labs = labs.len(),
            visits = visits.len(),
            "record generated"
        );

        Ok(Record {
            record_id,
            generated_on: today,
            patient: identity.patient,
            provider: identity.provider,
            insurance,
            medical_history,
            medications,
            vitals,
            labs,
            visits,
        })
    }

    /// Generate a CMS-1500 claim.
    ///
    /// With a record, the claim bills that record's patient, provider and
    /// coverage, and its chronic conditions seed the diagnosis list. Without
    /// one, a fresh identity and coverage are generated as fallbacks.
    pub fn generate_claim(&mut self, record: Option<&Record>, pool: Option<&[String]>) -> Claim {
        let today = self.clock.today();
        let rng = &mut self.rng;
        match record {
            Some(record) => claim::generate_claim(
                rng,
                today,
                &record.patient,
                &record.provider,
                &record.insurance,
                &record.medical_history.chronic_conditions,
                pool,
            ),
            None => {
                debug!("no record supplied; generating fallback identity for claim");
                let identity = generate_identity(rng, today);
                let insurance = generate_insurance(rng, today, true, &identity.patient, None);
                claim::generate_claim(
                    rng,
                    today,
                    &identity.patient,
                    &identity.provider,
                    &insurance,
                    &[],
                    pool,
                )
            }
        }
    }

    /// A single lab panel, correlated with `record` when one is given.
    pub fn generate_lab(&mut self, test_type: LabTestType, record: Option<&Record>) -> LabReport {
        let today = self.clock.today();
        let rng = &mut self.rng;
        let collected_on = days_before(rng, today, 0, 14);
        match record {
            Some(record) => generate_lab_report(
                rng,
                today,
                collected_on,
                test_type,
                &ConditionFlags::from_conditions(&record.medical_history.chronic_conditions),
                &record.provider.display_name(),
            ),
            None => {
                let provider = generate_identity(rng, today).provider;
                generate_lab_report(
                    rng,
                    today,
                    collected_on,
                    test_type,
                    &ConditionFlags::default(),
                    &provider.display_name(),
                )
            }
        }
    }

    /// A single visit dated within the last two weeks, correlated with
    /// `record` when one is given.
    pub fn generate_visit(&mut self, record: Option<&Record>) -> VisitReport {
        let today = self.clock.today();
        let rng = &mut self.rng;
        let date = today - Duration::days(rng.random_range(0..=14));
        match record {
            Some(record) => {
                let conditions = &record.medical_history.chronic_conditions;
                let body = match record.vitals.last() {
                    Some(latest) => Body {
                        height_in: latest.height_in,
                        baseline_weight_lbs: latest.weight_lbs,
                    },
                    None => Body::sample(
                        rng,
                        record.patient.gender,
                        ConditionFlags::from_conditions(conditions).obesity,
                    ),
                };
                generate_visit(rng, date, conditions, &body, &record.provider.display_name())
            }
            None => {
                let identity = generate_identity(rng, today);
                let body = Body::sample(rng, identity.patient.gender, false);
                generate_visit(rng, date, &[], &body, &identity.provider.display_name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mockchart_contracts::{error::MockchartError, record::Complexity};

    use super::*;
    use crate::traits::FixedClock;

    fn generator(seed: u64) -> ChartGenerator {
        ChartGenerator::new(
            seed,
            Box::new(FixedClock(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())),
        )
    }

    #[test]
    fn test_record_follows_options() {
        let mut g = generator(1);
        let options = GenerationOptions {
            complexity: Complexity::High,
            visit_count: 4,
            lab_test_count: 3,
            include_secondary_insurance: false,
            distinct_subscriber: false,
        };
        let record = g.generate_record(&options).unwrap();
        assert_eq!(record.medical_history.chronic_conditions.len(), 6);
        assert_eq!(record.vitals.len(), 4);
        assert_eq!(record.visits.len(), 4);
        assert_eq!(record.labs.len(), 3);
        assert!(record.insurance.secondary_insurance.is_none());
        assert_eq!(record.generated_on, g.today());
    }

    #[test]
    fn test_visits_share_vitals_dates() {
        let mut g = generator(2);
        let record = g.generate_record(&GenerationOptions::default()).unwrap();
        for (visit, vitals) in record.visits.iter().zip(&record.vitals) {
            assert_eq!(visit.note.visit_date, vitals.recorded_on);
            assert_eq!(visit.vitals.height_in, vitals.height_in);
        }
    }

    #[test]
    fn test_invalid_options_rejected() {
        let mut g = generator(3);
        let options = GenerationOptions {
            visit_count: 50,
            ..Default::default()
        };
        assert!(matches!(
            g.generate_record(&options),
            Err(MockchartError::InvalidOptions { .. })
        ));
    }

    #[test]
    fn test_claim_bills_record_identity() {
        let mut g = generator(4);
        let record = g.generate_record(&GenerationOptions::default()).unwrap();
        let claim = g.generate_claim(Some(&record), None);
        assert_eq!(claim.patient_name, record.patient.claim_name());
        assert_eq!(claim.insured_id, record.insurance.primary_insurance.member_id);
        assert_eq!(claim.federal_tax_id, record.provider.tax_id);
        let first_condition = record.medical_history.chronic_conditions[0].icd_code.clone();
        assert_eq!(claim.diagnosis_codes[0], first_condition);
    }

    #[test]
    fn test_fallbacks_without_record() {
        let mut g = generator(5);
        let claim = g.generate_claim(None, None);
        assert!((2..=4).contains(&claim.diagnosis_codes.len()));
        let lab = g.generate_lab(LabTestType::Urinalysis, None);
        assert_eq!(lab.test_type, LabTestType::Urinalysis);
        let visit = g.generate_visit(None);
        assert!(visit.note.visit_date <= g.today());
    }

    #[test]
    fn test_single_lab_uses_record_provider() {
        let mut g = generator(6);
        let record = g.generate_record(&GenerationOptions::default()).unwrap();
        let lab = g.generate_lab(LabTestType::LipidPanel, Some(&record));
        assert_eq!(lab.ordering_provider, record.provider.display_name());
    }
}
