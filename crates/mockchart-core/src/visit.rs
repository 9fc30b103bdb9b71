//! Visit note generator.
//!
//! Note text is assembled from condition-specific phrases plus one or two
//! generic fillers per section. Each visit takes its own vitals snapshot and
//! the assessment lines for hypertension and COPD read off that snapshot.

use chrono::NaiveDate;
use rand::{seq::IndexedRandom, Rng};
use tracing::debug;

use mockchart_contracts::{
    clinical::{ResultFlag, VisitNote, VisitReport, VisitType, VitalSigns},
    history::{ChronicCondition, ConditionKind, ConditionStatus},
};

use crate::{
    conditions::ConditionFlags,
    rng::pick_weighted,
    vitals::{vitals_snapshot, Body},
};

pub const MAX_COMPLAINT_LINES: usize = 4;
pub const MAX_ASSESSMENT_LINES: usize = 5;
pub const MAX_PLAN_LINES: usize = 5;

const GENERIC_COMPLAINTS: &[&str] = &[
    "Routine follow-up of chronic conditions",
    "Medication refill request",
    "Fatigue for the past several weeks",
    "Intermittent headaches",
    "Difficulty sleeping",
    "Mild lower back pain",
    "Review of recent lab results",
];

const GENERIC_ASSESSMENTS: &[&str] = &[
    "Health maintenance up to date",
    "Medication adherence reviewed, patient reports good compliance",
    "No acute distress",
    "Sleep disturbance, likely multifactorial",
    "Age-appropriate screening discussed",
];

const GENERIC_PLANS: &[&str] = &[
    "Continue current medications",
    "Encourage regular physical activity, 150 minutes per week",
    "Dietary counseling provided",
    "Repeat basic metabolic panel before next visit",
    "Influenza vaccine offered",
    "Patient educated on warning signs requiring urgent care",
];

const ROUTINE_FOLLOW_UPS: &[&str] = &["Return in 3 months", "Return in 6 months", "Return in 4 weeks"];

/// `(chief complaint, plan)` phrases for a condition.
fn condition_phrases(kind: ConditionKind) -> (&'static str, &'static str) {
    match kind {
        ConditionKind::Hypertension => (
            "Blood pressure check",
            "Continue antihypertensive therapy, home BP log",
        ),
        ConditionKind::Type2Diabetes => (
            "Diabetes follow-up",
            "Check HbA1c, reinforce carbohydrate-controlled diet",
        ),
        ConditionKind::Hyperlipidemia => (
            "Cholesterol management",
            "Continue statin, repeat lipid panel in 3 months",
        ),
        ConditionKind::Copd => (
            "Shortness of breath with exertion",
            "Continue inhaled maintenance therapy, pulmonary rehab referral",
        ),
        ConditionKind::Asthma => ("Wheezing episodes", "Review inhaler technique, asthma action plan"),
        ConditionKind::ChronicKidneyDisease => (
            "Kidney function follow-up",
            "Monitor renal function and electrolytes, avoid NSAIDs",
        ),
        ConditionKind::CoronaryArteryDisease => (
            "Occasional chest tightness",
            "Continue antiplatelet and beta-blocker therapy",
        ),
        ConditionKind::HeartFailure => (
            "Lower extremity swelling",
            "Daily weights, sodium restriction under 2 g per day",
        ),
        ConditionKind::AtrialFibrillation => (
            "Palpitations",
            "Continue anticoagulation, rate control reviewed",
        ),
        ConditionKind::Hypothyroidism => ("Thyroid follow-up", "Check TSH, continue levothyroxine"),
        ConditionKind::Depression => ("Low mood", "Continue antidepressant, PHQ-9 at next visit"),
        ConditionKind::Anxiety => ("Increased worry and restlessness", "Counseling referral offered"),
        ConditionKind::Osteoarthritis => (
            "Knee pain worse with activity",
            "Physical therapy referral, weight-bearing exercise as tolerated",
        ),
        ConditionKind::Gerd => ("Heartburn after meals", "Continue PPI, avoid late meals"),
        ConditionKind::Obesity => ("Weight management", "Nutrition referral, weight loss goals set"),
        ConditionKind::Migraine => ("Recurrent headaches", "Headache diary, continue prophylaxis"),
    }
}

/// Assessment line for a condition; hypertension and COPD reflect `vitals`.
fn assessment_line(condition: &ChronicCondition, vitals: &VitalSigns) -> String {
    match condition.kind {
        ConditionKind::Hypertension => {
            let bp = vitals.blood_pressure;
            if bp.flag.is_abnormal() {
                format!(
                    "{}, suboptimally controlled (BP {}/{})",
                    condition.name, bp.systolic, bp.diastolic
                )
            } else {
                format!("{}, well controlled (BP {}/{})", condition.name, bp.systolic, bp.diastolic)
            }
        }
        ConditionKind::Copd => {
            let spo2 = vitals.oxygen_saturation;
            if spo2.flag.is_abnormal() {
                format!(
                    "{}, with reduced oxygen saturation ({}% on room air)",
                    condition.name, spo2.value
                )
            } else {
                format!("{}, stable", condition.name)
            }
        }
        _ => {
            let status = match condition.status {
                ConditionStatus::Active => "active, continue monitoring",
                ConditionStatus::Controlled => "controlled on current therapy",
                ConditionStatus::Managed => "managed, stable",
            };
            format!("{} ({}), {}", condition.name, condition.icd_code, status)
        }
    }
}

fn with_fillers<R: Rng>(rng: &mut R, mut lines: Vec<String>, pool: &[&str], cap: usize) -> Vec<String> {
    lines.truncate(cap.saturating_sub(1));
    let fillers = rng.random_range(1..=2);
    for filler in pool.choose_multiple(rng, fillers) {
        if lines.len() >= cap {
            break;
        }
        lines.push(filler.to_string());
    }
    lines
}

fn follow_up<R: Rng>(rng: &mut R, visit_type: VisitType, vitals: &VitalSigns) -> String {
    let flags = [
        vitals.blood_pressure.flag,
        vitals.heart_rate.flag,
        vitals.respiratory_rate.flag,
        vitals.temperature_f.flag,
        vitals.oxygen_saturation.flag,
    ];
    if flags.contains(&ResultFlag::Critical) {
        return "Return in 1 week".to_string();
    }
    if flags.iter().any(|f| f.is_abnormal()) {
        return "Return in 2-4 weeks for recheck".to_string();
    }
    match visit_type {
        VisitType::AnnualPhysical => "Return in 12 months for annual physical".to_string(),
        _ => ROUTINE_FOLLOW_UPS[rng.random_range(0..ROUTINE_FOLLOW_UPS.len())].to_string(),
    }
}

/// A visit on `date` with its own vitals snapshot.
pub fn generate_visit<R: Rng>(
    rng: &mut R,
    date: NaiveDate,
    conditions: &[ChronicCondition],
    body: &Body,
    provider_name: &str,
) -> VisitReport {
    let flags = ConditionFlags::from_conditions(conditions);
    let vitals = vitals_snapshot(rng, date, &flags, body);

    let visit_type = pick_weighted(
        rng,
        &[
            (VisitType::OfficeVisit, 50),
            (VisitType::FollowUp, 35),
            (VisitType::AnnualPhysical, 15),
        ],
    );

    let complaints = conditions
        .iter()
        .map(|c| condition_phrases(c.kind).0.to_string())
        .collect();
    let assessments = conditions
        .iter()
        .map(|c| assessment_line(c, &vitals))
        .collect();
    let plans = conditions
        .iter()
        .map(|c| condition_phrases(c.kind).1.to_string())
        .collect();

    let note = VisitNote {
        visit_date: date,
        visit_type,
        chief_complaint: with_fillers(rng, complaints, GENERIC_COMPLAINTS, MAX_COMPLAINT_LINES),
        assessment: with_fillers(rng, assessments, GENERIC_ASSESSMENTS, MAX_ASSESSMENT_LINES),
        plan: with_fillers(rng, plans, GENERIC_PLANS, MAX_PLAN_LINES),
        follow_up: follow_up(rng, visit_type, &vitals),
    };
    debug!(%date, ?visit_type, "visit generated");
    VisitReport {
        note,
        vitals,
        provider_name: provider_name.to_string(),
    }
}
