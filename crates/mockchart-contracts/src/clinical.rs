//! Vital signs, lab reports and visit notes.
//!
//! Every numeric or categorical result carries a [`ResultFlag`] derived from
//! where the value falls relative to its reference range.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::MockchartError;

/// Result qualifier attached to a measured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultFlag {
    Normal,
    High,
    Low,
    Critical,
    Abnormal,
}

impl ResultFlag {
    /// True for every flag other than `Normal`.
    pub fn is_abnormal(self) -> bool {
        self != ResultFlag::Normal
    }

    /// Ordering used when two readings share one flag (blood pressure).
    pub fn severity(self) -> u8 {
        match self {
            ResultFlag::Normal => 0,
            ResultFlag::Abnormal | ResultFlag::High | ResultFlag::Low => 1,
            ResultFlag::Critical => 2,
        }
    }
}

/// A scalar measurement and its flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub value: f64,
    pub flag: ResultFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: u32,
    pub diastolic: u32,
    /// The more severe of the systolic and diastolic flags.
    pub flag: ResultFlag,
}

/// One set of vitals. `bmi` is always derived from weight and height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    pub recorded_on: NaiveDate,
    pub blood_pressure: BloodPressure,
    pub heart_rate: Reading,
    pub respiratory_rate: Reading,
    pub temperature_f: Reading,
    pub oxygen_saturation: Reading,
    pub weight_lbs: f64,
    pub height_in: f64,
    pub bmi: Reading,
}

/// Lab panels the generator knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabTestType {
    CompleteBloodCount,
    ComprehensiveMetabolicPanel,
    LipidPanel,
    HemoglobinA1c,
    ThyroidPanel,
    Urinalysis,
}

impl LabTestType {
    pub const ALL: [LabTestType; 6] = [
        LabTestType::CompleteBloodCount,
        LabTestType::ComprehensiveMetabolicPanel,
        LabTestType::LipidPanel,
        LabTestType::HemoglobinA1c,
        LabTestType::ThyroidPanel,
        LabTestType::Urinalysis,
    ];

    pub fn panel_name(self) -> &'static str {
        match self {
            LabTestType::CompleteBloodCount => "Complete Blood Count (CBC) with Differential",
            LabTestType::ComprehensiveMetabolicPanel => "Comprehensive Metabolic Panel (CMP)",
            LabTestType::LipidPanel => "Lipid Panel",
            LabTestType::HemoglobinA1c => "Hemoglobin A1c",
            LabTestType::ThyroidPanel => "Thyroid Panel",
            LabTestType::Urinalysis => "Urinalysis, Complete",
        }
    }

    /// CPT code billed for the panel.
    pub fn cpt_code(self) -> &'static str {
        match self {
            LabTestType::CompleteBloodCount => "85025",
            LabTestType::ComprehensiveMetabolicPanel => "80053",
            LabTestType::LipidPanel => "80061",
            LabTestType::HemoglobinA1c => "83036",
            LabTestType::ThyroidPanel => "84443",
            LabTestType::Urinalysis => "81001",
        }
    }

    pub fn specimen(self) -> &'static str {
        match self {
            LabTestType::Urinalysis => "Urine, clean catch",
            LabTestType::HemoglobinA1c | LabTestType::CompleteBloodCount => {
                "Whole blood (EDTA)"
            }
            _ => "Serum",
        }
    }

    /// Short command-line name, the inverse of `FromStr`.
    pub fn slug(self) -> &'static str {
        match self {
            LabTestType::CompleteBloodCount => "cbc",
            LabTestType::ComprehensiveMetabolicPanel => "cmp",
            LabTestType::LipidPanel => "lipid",
            LabTestType::HemoglobinA1c => "a1c",
            LabTestType::ThyroidPanel => "thyroid",
            LabTestType::Urinalysis => "urinalysis",
        }
    }
}

impl fmt::Display for LabTestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for LabTestType {
    type Err = MockchartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        LabTestType::ALL
            .into_iter()
            .find(|t| t.slug() == needle)
            .ok_or_else(|| MockchartError::UnknownLabTest { name: s.to_string() })
    }
}

/// A lab value: numeric for measured analytes, text for categorical ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabValue {
    Numeric(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabTestResult {
    pub test_name: String,
    pub value: LabValue,
    pub unit: String,
    /// Human-readable range, e.g. `70 - 99` or `Yellow`.
    pub reference_range: String,
    pub flag: ResultFlag,
}

/// One resulted lab panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabReport {
    pub test_type: LabTestType,
    pub panel_name: String,
    pub accession_number: String,
    pub specimen: String,
    pub collected_on: NaiveDate,
    pub reported_on: NaiveDate,
    pub ordering_provider: String,
    pub results: Vec<LabTestResult>,
}

impl LabReport {
    pub fn abnormal_results(&self) -> impl Iterator<Item = &LabTestResult> {
        self.results.iter().filter(|r| r.flag.is_abnormal())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitType {
    #[serde(rename = "Office Visit")]
    OfficeVisit,
    #[serde(rename = "Follow-up")]
    FollowUp,
    #[serde(rename = "Annual Physical")]
    AnnualPhysical,
}

/// Free-text portions of a visit, each held as display lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitNote {
    pub visit_date: NaiveDate,
    pub visit_type: VisitType,
    pub chief_complaint: Vec<String>,
    pub assessment: Vec<String>,
    pub plan: Vec<String>,
    pub follow_up: String,
}

/// A visit note paired with the vitals taken at that visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitReport {
    pub note: VisitNote,
    pub vitals: VitalSigns,
    pub provider_name: String,
}
