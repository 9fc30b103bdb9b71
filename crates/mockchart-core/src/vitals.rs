//! Vital signs correlated with the problem list.
//!
//! Blood pressure and heart rate follow the cardiovascular flags, respiratory
//! rate and oxygen saturation follow COPD. BMI is derived from weight and
//! height, never sampled.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use tracing::debug;

use mockchart_contracts::{
    clinical::{BloodPressure, Reading, ResultFlag, VitalSigns},
    history::ChronicCondition,
    patient::Gender,
};

use crate::{
    conditions::ConditionFlags,
    correlate::{classify, correlated, decide, sample, Bias, Direction, ParameterSpec},
    rng::round_to,
};

// ── Parameter specs ──────────────────────────────────────────────────────────

pub fn systolic_spec() -> ParameterSpec {
    ParameterSpec::new(100.0, 129.0, 0)
        .window(85.0, 185.0)
        .critical(90.0, 180.0)
        .abnormal(0.2, 0.6)
}

pub fn diastolic_spec() -> ParameterSpec {
    ParameterSpec::new(60.0, 84.0, 0)
        .window(50.0, 115.0)
        .critical(55.0, 110.0)
}

pub fn heart_rate_spec() -> ParameterSpec {
    ParameterSpec::new(60.0, 100.0, 0)
        .window(45.0, 130.0)
        .critical(50.0, 120.0)
        .abnormal(0.15, 0.4)
}

pub fn respiratory_rate_spec() -> ParameterSpec {
    ParameterSpec::new(12.0, 20.0, 0)
        .window(8.0, 28.0)
        .critical(10.0, 24.0)
        .abnormal(0.1, 0.5)
}

pub fn temperature_spec() -> ParameterSpec {
    ParameterSpec::new(97.0, 99.0, 1)
        .window(95.5, 103.0)
        .critical(96.0, 101.5)
        .abnormal(0.1, 0.1)
}

/// Saturation cannot exceed 100, so only the low side is abnormal.
pub fn oxygen_saturation_spec() -> ParameterSpec {
    ParameterSpec::new(95.0, 100.0, 0)
        .window(84.0, 100.0)
        .critical(88.0, 101.0)
        .abnormal(0.1, 0.6)
}

/// Classification only; BMI is derived.
pub fn bmi_spec() -> ParameterSpec {
    ParameterSpec::new(18.5, 24.9, 1).critical(16.0, 40.0)
}

/// `weight / height² × 703`, one decimal.
pub fn bmi(weight_lbs: f64, height_in: f64) -> f64 {
    round_to(weight_lbs / (height_in * height_in) * 703.0, 1)
}

/// The more severe of two flags; ties keep the first.
pub fn worst_flag(a: ResultFlag, b: ResultFlag) -> ResultFlag {
    if b.severity() > a.severity() {
        b
    } else {
        a
    }
}

// ── Body ─────────────────────────────────────────────────────────────────────

/// Per-patient baseline that keeps weight and height stable across visits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub height_in: f64,
    pub baseline_weight_lbs: f64,
}

impl Body {
    /// Height by gender, weight from a target BMI (30–40 when obese).
    pub fn sample<R: Rng>(rng: &mut R, gender: Gender, obese: bool) -> Self {
        let height_in = round_to(
            match gender {
                Gender::Male => rng.random_range(64.0..=75.0),
                Gender::Female => rng.random_range(59.0..=70.0),
            },
            1,
        );
        let target_bmi: f64 = if obese {
            rng.random_range(30.0..=40.0)
        } else {
            rng.random_range(19.0..=29.5)
        };
        Self {
            height_in,
            baseline_weight_lbs: round_to(target_bmi * height_in * height_in / 703.0, 1),
        }
    }
}

// ── Generation ───────────────────────────────────────────────────────────────

/// One vitals snapshot taken on `date`.
pub fn vitals_snapshot<R: Rng>(
    rng: &mut R,
    date: NaiveDate,
    flags: &ConditionFlags,
    body: &Body,
) -> VitalSigns {
    let cardiac = flags.hypertension || flags.heart_disease;

    // Systolic and diastolic move together.
    let sys_spec = systolic_spec();
    let dia_spec = diastolic_spec();
    let bp_decision = decide(rng, &sys_spec, Bias::when(cardiac, Direction::High));
    let systolic = sample(rng, &sys_spec, bp_decision);
    let diastolic = sample(rng, &dia_spec, bp_decision);
    let blood_pressure = BloodPressure {
        systolic: systolic as u32,
        diastolic: diastolic as u32,
        flag: worst_flag(classify(systolic, &sys_spec), classify(diastolic, &dia_spec)),
    };

    let heart_rate = correlated(
        rng,
        &heart_rate_spec(),
        Bias {
            active: flags.heart_disease,
            direction: None,
        },
    );
    let respiratory_rate = correlated(
        rng,
        &respiratory_rate_spec(),
        Bias::when(flags.copd, Direction::High),
    );
    let temperature_f = correlated(rng, &temperature_spec(), Bias::none());
    let oxygen_saturation = correlated(
        rng,
        &oxygen_saturation_spec(),
        Bias::when(flags.copd, Direction::Low),
    );

    let weight_lbs = round_to(body.baseline_weight_lbs + rng.random_range(-3.0..=3.0), 1);
    let bmi_value = bmi(weight_lbs, body.height_in);

    VitalSigns {
        recorded_on: date,
        blood_pressure,
        heart_rate,
        respiratory_rate,
        temperature_f,
        oxygen_saturation,
        weight_lbs,
        height_in: body.height_in,
        bmi: Reading {
            value: bmi_value,
            flag: classify(bmi_value, &bmi_spec()),
        },
    }
}

/// `count` snapshots in ascending date order, roughly a month apart, the
/// latest within a week of `today`.
pub fn generate_vitals<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    count: usize,
    conditions: &[ChronicCondition],
    body: &Body,
) -> Vec<VitalSigns> {
    let flags = ConditionFlags::from_conditions(conditions);
    let vitals: Vec<VitalSigns> = (0..count)
        .map(|i| {
            let months_back = (count - 1 - i) as i64;
            let offset = months_back * 30 + rng.random_range(0..=5);
            vitals_snapshot(rng, today - Duration::days(offset), &flags, body)
        })
        .collect();
    debug!(count = vitals.len(), ?flags, "vitals generated");
    vitals
}
