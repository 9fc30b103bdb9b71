//! Medical history: the pivot entity every correlated generator reads.
//!
//! Chronic conditions carry a tagged [`ConditionKind`] fixed at creation time.
//! Downstream correlators switch on the kind rather than re-reading the
//! free-text name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Broad clinical family a condition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionCategory {
    Cardiovascular,
    Metabolic,
    Respiratory,
    Renal,
    Endocrine,
    Psychiatric,
    Musculoskeletal,
    Gastrointestinal,
    Neurological,
}

/// The closed set of chronic conditions the generator can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionKind {
    Hypertension,
    Type2Diabetes,
    Hyperlipidemia,
    Copd,
    Asthma,
    ChronicKidneyDisease,
    CoronaryArteryDisease,
    HeartFailure,
    AtrialFibrillation,
    Hypothyroidism,
    Depression,
    Anxiety,
    Osteoarthritis,
    Gerd,
    Obesity,
    Migraine,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 16] = [
        ConditionKind::Hypertension,
        ConditionKind::Type2Diabetes,
        ConditionKind::Hyperlipidemia,
        ConditionKind::Copd,
        ConditionKind::Asthma,
        ConditionKind::ChronicKidneyDisease,
        ConditionKind::CoronaryArteryDisease,
        ConditionKind::HeartFailure,
        ConditionKind::AtrialFibrillation,
        ConditionKind::Hypothyroidism,
        ConditionKind::Depression,
        ConditionKind::Anxiety,
        ConditionKind::Osteoarthritis,
        ConditionKind::Gerd,
        ConditionKind::Obesity,
        ConditionKind::Migraine,
    ];

    /// Display name used in history lists and visit notes.
    pub fn label(self) -> &'static str {
        match self {
            ConditionKind::Hypertension => "Essential Hypertension",
            ConditionKind::Type2Diabetes => "Type 2 Diabetes Mellitus",
            ConditionKind::Hyperlipidemia => "Hyperlipidemia",
            ConditionKind::Copd => "Chronic Obstructive Pulmonary Disease (COPD)",
            ConditionKind::Asthma => "Asthma",
            ConditionKind::ChronicKidneyDisease => "Chronic Kidney Disease, Stage 3",
            ConditionKind::CoronaryArteryDisease => "Coronary Artery Disease",
            ConditionKind::HeartFailure => "Congestive Heart Failure",
            ConditionKind::AtrialFibrillation => "Atrial Fibrillation",
            ConditionKind::Hypothyroidism => "Hypothyroidism",
            ConditionKind::Depression => "Major Depressive Disorder",
            ConditionKind::Anxiety => "Generalized Anxiety Disorder",
            ConditionKind::Osteoarthritis => "Osteoarthritis",
            ConditionKind::Gerd => "Gastroesophageal Reflux Disease (GERD)",
            ConditionKind::Obesity => "Obesity",
            ConditionKind::Migraine => "Migraine",
        }
    }

    /// ICD-10-CM code billed for this condition.
    pub fn icd_code(self) -> &'static str {
        match self {
            ConditionKind::Hypertension => "I10",
            ConditionKind::Type2Diabetes => "E11.9",
            ConditionKind::Hyperlipidemia => "E78.5",
            ConditionKind::Copd => "J44.9",
            ConditionKind::Asthma => "J45.909",
            ConditionKind::ChronicKidneyDisease => "N18.30",
            ConditionKind::CoronaryArteryDisease => "I25.10",
            ConditionKind::HeartFailure => "I50.9",
            ConditionKind::AtrialFibrillation => "I48.91",
            ConditionKind::Hypothyroidism => "E03.9",
            ConditionKind::Depression => "F32.9",
            ConditionKind::Anxiety => "F41.1",
            ConditionKind::Osteoarthritis => "M19.90",
            ConditionKind::Gerd => "K21.9",
            ConditionKind::Obesity => "E66.9",
            ConditionKind::Migraine => "G43.909",
        }
    }

    pub fn category(self) -> ConditionCategory {
        match self {
            ConditionKind::Hypertension
            | ConditionKind::CoronaryArteryDisease
            | ConditionKind::HeartFailure
            | ConditionKind::AtrialFibrillation => ConditionCategory::Cardiovascular,
            ConditionKind::Type2Diabetes
            | ConditionKind::Hyperlipidemia
            | ConditionKind::Obesity => ConditionCategory::Metabolic,
            ConditionKind::Copd | ConditionKind::Asthma => ConditionCategory::Respiratory,
            ConditionKind::ChronicKidneyDisease => ConditionCategory::Renal,
            ConditionKind::Hypothyroidism => ConditionCategory::Endocrine,
            ConditionKind::Depression | ConditionKind::Anxiety => ConditionCategory::Psychiatric,
            ConditionKind::Osteoarthritis => ConditionCategory::Musculoskeletal,
            ConditionKind::Gerd => ConditionCategory::Gastrointestinal,
            ConditionKind::Migraine => ConditionCategory::Neurological,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    Active,
    Controlled,
    Managed,
}

/// A long-running diagnosis on the patient's problem list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChronicCondition {
    pub kind: ConditionKind,
    pub category: ConditionCategory,
    pub name: String,
    pub icd_code: String,
    pub diagnosed_date: NaiveDate,
    pub status: ConditionStatus,
}

impl ChronicCondition {
    /// Build a condition whose name, code and category all follow `kind`.
    pub fn new(kind: ConditionKind, diagnosed_date: NaiveDate, status: ConditionStatus) -> Self {
        Self {
            kind,
            category: kind.category(),
            name: kind.label().to_string(),
            icd_code: kind.icd_code().to_string(),
            diagnosed_date,
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllergySeverity {
    Mild,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allergy {
    pub allergen: String,
    pub reaction: String,
    pub severity: AllergySeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurgicalHistory {
    pub procedure: String,
    pub date: NaiveDate,
    pub hospital: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyHistory {
    /// Family member, e.g. `Mother`.
    pub relation: String,
    pub condition: String,
    pub age_at_diagnosis: Option<u32>,
    pub deceased: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TobaccoUse {
    Never,
    Former,
    Current,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialHistory {
    pub tobacco: TobaccoUse,
    /// Pack-years, present only for current or former smokers.
    pub pack_years: Option<u32>,
    pub alcohol: String,
    pub exercise: String,
}

/// Everything known about the patient's past.
///
/// `allergies` is `None` when the patient has no known allergies; the
/// presentation layer renders the empty-state text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    pub allergies: Option<Vec<Allergy>>,
    pub chronic_conditions: Vec<ChronicCondition>,
    pub surgical_history: Vec<SurgicalHistory>,
    pub family_history: Vec<FamilyHistory>,
    pub social_history: SocialHistory,
}

impl MedicalHistory {
    pub fn has_known_allergies(&self) -> bool {
        self.allergies.as_ref().is_some_and(|a| !a.is_empty())
    }

    pub fn has_condition(&self, kind: ConditionKind) -> bool {
        self.chronic_conditions.iter().any(|c| c.kind == kind)
    }
}
