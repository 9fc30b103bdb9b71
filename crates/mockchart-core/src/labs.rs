//! Lab panel correlator.
//!
//! Each panel is a fixed list of analytes. Numeric analytes run through the
//! shared range sampler with a condition-driven [`Bias`]; categorical ones
//! use an ordered option list whose first entry is the normal finding.
//!
//! | Driver            | Analytes pushed abnormal                  |
//! |-------------------|-------------------------------------------|
//! | diabetes          | glucose, HbA1c, triglycerides (high)      |
//! | kidney disease    | BUN, creatinine, potassium (high); eGFR, hemoglobin, hematocrit (low) |
//! | hyperlipidemia    | total cholesterol, LDL, triglycerides (high); HDL (low) |
//! | hypothyroidism    | TSH (high); free T4 (low)                 |
//! | COPD              | CO2 (high)                                |

use chrono::{Duration, NaiveDate};
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use mockchart_contracts::{
    clinical::{LabReport, LabTestResult, LabTestType, LabValue},
    history::ChronicCondition,
};

use crate::{
    conditions::ConditionFlags,
    correlate::{categorical, correlated, Bias, Direction, ParameterSpec},
    rng::{days_before, digits},
};

/// How an analyte is sampled.
#[derive(Debug, Clone, Copy)]
pub enum AnalyteKind {
    Numeric {
        spec: ParameterSpec,
        bias: fn(&ConditionFlags) -> Bias,
    },
    /// Ordered options, normal first.
    Categorical(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct Analyte {
    pub name: &'static str,
    pub unit: &'static str,
    pub kind: AnalyteKind,
}

fn numeric(
    name: &'static str,
    unit: &'static str,
    spec: ParameterSpec,
    bias: fn(&ConditionFlags) -> Bias,
) -> Analyte {
    Analyte {
        name,
        unit,
        kind: AnalyteKind::Numeric { spec, bias },
    }
}

fn categorical_analyte(name: &'static str, options: &'static [&'static str]) -> Analyte {
    Analyte {
        name,
        unit: "",
        kind: AnalyteKind::Categorical(options),
    }
}

fn unbiased(_: &ConditionFlags) -> Bias {
    Bias::none()
}

/// Analyte table for a panel, in report order.
pub fn panel_analytes(test_type: LabTestType) -> Vec<Analyte> {
    let r = ParameterSpec::new;
    match test_type {
        LabTestType::CompleteBloodCount => vec![
            numeric("White Blood Cell Count (WBC)", "x10^3/uL", r(4.5, 11.0, 1), unbiased),
            numeric("Red Blood Cell Count (RBC)", "x10^6/uL", r(4.2, 5.9, 2), unbiased),
            numeric("Hemoglobin", "g/dL", r(12.0, 17.5, 1).abnormal(0.15, 0.5), |f| {
                Bias::when(f.kidney_disease, Direction::Low)
            }),
            numeric("Hematocrit", "%", r(36.0, 50.0, 1).abnormal(0.15, 0.4), |f| {
                Bias::when(f.kidney_disease, Direction::Low)
            }),
            numeric("Platelet Count", "x10^3/uL", r(150.0, 400.0, 0), unbiased),
            numeric("Mean Corpuscular Volume (MCV)", "fL", r(80.0, 100.0, 0), unbiased),
        ],
        LabTestType::ComprehensiveMetabolicPanel => vec![
            numeric("Glucose", "mg/dL", r(70.0, 99.0, 0).abnormal(0.15, 0.6), |f| {
                Bias::when(f.diabetes, Direction::High)
            }),
            numeric("Blood Urea Nitrogen (BUN)", "mg/dL", r(7.0, 20.0, 0).abnormal(0.15, 0.6), |f| {
                Bias::when(f.kidney_disease, Direction::High)
            }),
            numeric("Creatinine", "mg/dL", r(0.6, 1.2, 2).abnormal(0.15, 0.7), |f| {
                Bias::when(f.kidney_disease, Direction::High)
            }),
            numeric(
                "eGFR",
                "mL/min/1.73m2",
                r(90.0, 120.0, 0)
                    .window(15.0, 120.0)
                    .critical(30.0, 200.0)
                    .abnormal(0.15, 0.7),
                |f| Bias::when(f.kidney_disease, Direction::Low),
            ),
            numeric(
                "Sodium",
                "mmol/L",
                r(136.0, 145.0, 0).window(125.0, 155.0).critical(130.0, 150.0),
                unbiased,
            ),
            numeric(
                "Potassium",
                "mmol/L",
                r(3.5, 5.1, 1).critical(3.0, 6.0).abnormal(0.15, 0.4),
                |f| Bias::when(f.kidney_disease, Direction::High),
            ),
            numeric("Chloride", "mmol/L", r(98.0, 107.0, 0).window(90.0, 115.0), unbiased),
            numeric("Carbon Dioxide (CO2)", "mmol/L", r(23.0, 29.0, 0).abnormal(0.15, 0.4), |f| {
                Bias::when(f.copd, Direction::High)
            }),
            numeric("Calcium", "mg/dL", r(8.5, 10.5, 1).window(7.0, 12.0), unbiased),
            numeric("Total Protein", "g/dL", r(6.0, 8.3, 1), unbiased),
            numeric("Albumin", "g/dL", r(3.5, 5.0, 1), unbiased),
            numeric("Alanine Aminotransferase (ALT)", "U/L", r(7.0, 56.0, 0), unbiased),
            numeric("Aspartate Aminotransferase (AST)", "U/L", r(10.0, 40.0, 0), unbiased),
        ],
        LabTestType::LipidPanel => vec![
            numeric(
                "Total Cholesterol",
                "mg/dL",
                r(125.0, 199.0, 0).window(100.0, 300.0).critical(90.0, 280.0).abnormal(0.2, 0.6),
                |f| Bias::when(f.hyperlipidemia, Direction::High),
            ),
            numeric(
                "LDL Cholesterol",
                "mg/dL",
                r(50.0, 99.0, 0).window(50.0, 220.0).critical(40.0, 190.0).abnormal(0.2, 0.6),
                |f| Bias::when(f.hyperlipidemia, Direction::High),
            ),
            numeric(
                "HDL Cholesterol",
                "mg/dL",
                r(40.0, 60.0, 0).window(20.0, 60.0).critical(25.0, 100.0).abnormal(0.15, 0.4),
                |f| Bias::when(f.hyperlipidemia, Direction::Low),
            ),
            numeric(
                "Triglycerides",
                "mg/dL",
                r(50.0, 149.0, 0).window(50.0, 450.0).critical(30.0, 400.0).abnormal(0.15, 0.5),
                |f| Bias::when(f.hyperlipidemia || f.diabetes, Direction::High),
            ),
        ],
        LabTestType::HemoglobinA1c => vec![numeric(
            "Hemoglobin A1c",
            "%",
            r(4.0, 5.6, 1).window(3.8, 10.0).critical(3.0, 9.0).abnormal(0.15, 0.7),
            |f| Bias::when(f.diabetes, Direction::High),
        )],
        LabTestType::ThyroidPanel => vec![
            numeric(
                "Thyroid Stimulating Hormone (TSH)",
                "mIU/L",
                r(0.4, 4.0, 2).window(0.1, 12.0).critical(0.2, 10.0).abnormal(0.15, 0.6),
                |f| Bias::when(f.hypothyroidism, Direction::High),
            ),
            numeric("Free T4", "ng/dL", r(0.8, 1.8, 2).abnormal(0.15, 0.5), |f| {
                Bias::when(f.hypothyroidism, Direction::Low)
            }),
            numeric("Free T3", "pg/mL", r(2.3, 4.2, 1), unbiased),
        ],
        LabTestType::Urinalysis => vec![
            categorical_analyte("Color", &["Yellow", "Dark Yellow", "Amber", "Red", "Brown"]),
            categorical_analyte("Appearance", &["Clear", "Slightly Cloudy", "Cloudy", "Turbid"]),
            numeric(
                "Specific Gravity",
                "",
                r(1.005, 1.030, 3).window(1.001, 1.040).critical(1.000, 1.050).abnormal(0.1, 0.1),
                unbiased,
            ),
            numeric(
                "pH",
                "",
                r(5.0, 8.0, 1).window(4.5, 9.0).critical(4.0, 9.5).abnormal(0.1, 0.1),
                unbiased,
            ),
            categorical_analyte("Protein", &["Negative", "Trace", "1+", "2+", "3+"]),
            categorical_analyte("Glucose", &["Negative", "Trace", "1+", "2+"]),
            categorical_analyte("Ketones", &["Negative", "Trace", "Small", "Moderate"]),
            categorical_analyte("Blood", &["Negative", "Trace", "Small", "Moderate", "Large"]),
            categorical_analyte("Leukocyte Esterase", &["Negative", "Trace", "Small", "Moderate"]),
            categorical_analyte("Nitrite", &["Negative", "Positive"]),
        ],
    }
}

/// Panels a problem list calls for, in priority order.
pub fn indicated_panels(flags: &ConditionFlags) -> Vec<LabTestType> {
    let mut panels = Vec::new();
    if flags.diabetes {
        panels.push(LabTestType::HemoglobinA1c);
    }
    if flags.hyperlipidemia {
        panels.push(LabTestType::LipidPanel);
    }
    if flags.kidney_disease {
        panels.push(LabTestType::ComprehensiveMetabolicPanel);
    }
    if flags.hypothyroidism {
        panels.push(LabTestType::ThyroidPanel);
    }
    panels
}

fn result_for<R: Rng>(rng: &mut R, analyte: &Analyte, flags: &ConditionFlags) -> LabTestResult {
    let (value, reference_range, flag) = match analyte.kind {
        AnalyteKind::Numeric { spec, bias } => {
            let reading = correlated(rng, &spec, bias(flags));
            (LabValue::Numeric(reading.value), spec.reference_range(), reading.flag)
        }
        AnalyteKind::Categorical(options) => {
            let (value, flag) = categorical(rng, options);
            let normal = options.first().copied().unwrap_or_default();
            (LabValue::Text(value), normal.to_string(), flag)
        }
    };
    LabTestResult {
        test_name: analyte.name.to_string(),
        value,
        unit: analyte.unit.to_string(),
        reference_range,
        flag,
    }
}

/// One panel collected on `collected_on`. The report date trails collection
/// by up to three days but never passes `today`.
pub fn generate_lab_report<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    collected_on: NaiveDate,
    test_type: LabTestType,
    flags: &ConditionFlags,
    ordering_provider: &str,
) -> LabReport {
    let results: Vec<LabTestResult> = panel_analytes(test_type)
        .iter()
        .map(|analyte| result_for(rng, analyte, flags))
        .collect();
    let reported_on = (collected_on + Duration::days(rng.random_range(0..=3))).min(today);
    let accession_number = format!(
        "{}-{}",
        collected_on.format("%y%m%d"),
        digits(rng, 6)
    );
    LabReport {
        test_type,
        panel_name: test_type.panel_name().to_string(),
        accession_number,
        specimen: test_type.specimen().to_string(),
        collected_on,
        reported_on: reported_on.max(collected_on),
        ordering_provider: ordering_provider.to_string(),
        results,
    }
}

/// Up to `count` distinct panels, indicated ones first.
pub fn generate_labs<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    count: usize,
    conditions: &[ChronicCondition],
    ordering_provider: &str,
) -> Vec<LabReport> {
    let flags = ConditionFlags::from_conditions(conditions);
    let count = count.min(LabTestType::ALL.len());

    let mut panels = indicated_panels(&flags);
    let mut rest: Vec<LabTestType> = LabTestType::ALL
        .into_iter()
        .filter(|t| !panels.contains(t))
        .collect();
    rest.shuffle(rng);
    panels.extend(rest);
    panels.truncate(count);

    let labs: Vec<LabReport> = panels
        .into_iter()
        .map(|test_type| {
            let collected_on = days_before(rng, today, 0, 90);
            generate_lab_report(rng, today, collected_on, test_type, &flags, ordering_provider)
        })
        .collect();
    debug!(count = labs.len(), "labs generated");
    labs
}

#[cfg(test)]
mod tests {
    use mockchart_contracts::{
        clinical::ResultFlag,
        history::{ConditionKind, ConditionStatus},
    };

    use super::*;
    use crate::{correlate::classify, rng::seeded};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 14).unwrap()
    }

    fn with(kinds: &[ConditionKind]) -> Vec<ChronicCondition> {
        kinds
            .iter()
            .map(|k| ChronicCondition::new(*k, today() - Duration::days(900), ConditionStatus::Active))
            .collect()
    }

    fn numeric_value(report: &LabReport, name: &str) -> (f64, ResultFlag) {
        let result = report.results.iter().find(|r| r.test_name == name).unwrap();
        match result.value {
            LabValue::Numeric(v) => (v, result.flag),
            LabValue::Text(_) => panic!("{name} is categorical"),
        }
    }

    // ── 1. panel shape ───────────────────────────────────────────────────────

    #[test]
    fn test_every_panel_has_results() {
        let mut rng = seeded(30);
        for test_type in LabTestType::ALL {
            let report = generate_lab_report(
                &mut rng,
                today(),
                today(),
                test_type,
                &ConditionFlags::default(),
                "Dr",
            );
            assert_eq!(report.results.len(), panel_analytes(test_type).len());
            assert_eq!(report.panel_name, test_type.panel_name());
            assert_eq!(report.reported_on, today());
        }
    }

    #[test]
    fn test_numeric_flags_match_reference_ranges() {
        let mut rng = seeded(31);
        for _ in 0..50 {
            for test_type in LabTestType::ALL {
                let report = generate_lab_report(
                    &mut rng,
                    today(),
                    today() - Duration::days(5),
                    test_type,
                    &ConditionFlags::default(),
                    "Dr",
                );
                for (analyte, result) in panel_analytes(test_type).iter().zip(&report.results) {
                    match (analyte.kind, &result.value) {
                        (AnalyteKind::Numeric { spec, .. }, LabValue::Numeric(v)) => {
                            assert_eq!(result.flag, classify(*v, &spec), "{}", analyte.name);
                        }
                        (AnalyteKind::Categorical(options), LabValue::Text(v)) => {
                            let normal = v == options[0];
                            assert_eq!(result.flag == ResultFlag::Normal, normal);
                        }
                        _ => panic!("value kind mismatch for {}", analyte.name),
                    }
                }
            }
        }
    }

    // ── 2. correlation ───────────────────────────────────────────────────────

    #[test]
    fn test_diabetes_forces_glucose_high_when_abnormal() {
        let flags = ConditionFlags {
            diabetes: true,
            ..Default::default()
        };
        let mut rng = seeded(32);
        let mut high = 0;
        for _ in 0..400 {
            let report = generate_lab_report(
                &mut rng,
                today(),
                today(),
                LabTestType::ComprehensiveMetabolicPanel,
                &flags,
                "Dr",
            );
            let (value, flag) = numeric_value(&report, "Glucose");
            if flag.is_abnormal() {
                assert!(value > 99.0, "glucose {value} flagged {flag:?}");
                high += 1;
            }
        }
        assert!(high > 180, "high {high}");
    }

    #[test]
    fn test_indicated_panels_come_first() {
        let mut rng = seeded(33);
        let conds = with(&[ConditionKind::Type2Diabetes, ConditionKind::Hyperlipidemia]);
        for _ in 0..50 {
            let labs = generate_labs(&mut rng, today(), 3, &conds, "Dr");
            assert_eq!(labs.len(), 3);
            assert_eq!(labs[0].test_type, LabTestType::HemoglobinA1c);
            assert_eq!(labs[1].test_type, LabTestType::LipidPanel);
            assert_ne!(labs[2].test_type, LabTestType::HemoglobinA1c);
        }
    }

    #[test]
    fn test_count_is_clamped_and_panels_distinct() {
        let mut rng = seeded(34);
        let labs = generate_labs(&mut rng, today(), 40, &[], "Dr");
        assert_eq!(labs.len(), LabTestType::ALL.len());
        for t in LabTestType::ALL {
            assert_eq!(labs.iter().filter(|l| l.test_type == t).count(), 1);
        }
        for lab in &labs {
            assert!(lab.collected_on <= lab.reported_on);
            assert!(lab.reported_on <= today());
        }
    }
}
