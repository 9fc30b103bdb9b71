//! The assembled record and the options that shape it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    clinical::{LabReport, LabTestType, VisitReport, VitalSigns},
    error::{MockchartError, MockchartResult},
    history::MedicalHistory,
    insurance::InsuranceInfo,
    medication::Medications,
    patient::{Patient, Provider},
};

/// How much medical history a generated patient carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl Complexity {
    /// Number of chronic conditions on the problem list.
    pub fn condition_count(self) -> usize {
        match self {
            Complexity::Low => 2,
            Complexity::Medium => 4,
            Complexity::High => 6,
        }
    }

    /// Number of current medications the generator aims for.
    pub fn medication_target(self) -> usize {
        match self {
            Complexity::Low => 3,
            Complexity::Medium => 6,
            Complexity::High => 9,
        }
    }
}

/// Inputs to a full record generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub complexity: Complexity,
    pub visit_count: usize,
    pub lab_test_count: usize,
    pub include_secondary_insurance: bool,
    /// Generate a subscriber other than the patient for the primary policy.
    pub distinct_subscriber: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            complexity: Complexity::Medium,
            visit_count: 3,
            lab_test_count: 2,
            include_secondary_insurance: true,
            distinct_subscriber: false,
        }
    }
}

impl GenerationOptions {
    pub const MAX_VISITS: usize = 12;
    pub const MAX_LAB_TESTS: usize = LabTestType::ALL.len();

    /// Reject counts outside `0..=MAX_VISITS` and `0..=MAX_LAB_TESTS`.
    pub fn validate(&self) -> MockchartResult<()> {
        if self.visit_count > Self::MAX_VISITS {
            return Err(MockchartError::InvalidOptions {
                reason: format!(
                    "visit_count {} exceeds maximum {}",
                    self.visit_count,
                    Self::MAX_VISITS
                ),
            });
        }
        if self.lab_test_count > Self::MAX_LAB_TESTS {
            return Err(MockchartError::InvalidOptions {
                reason: format!(
                    "lab_test_count {} exceeds maximum {}",
                    self.lab_test_count,
                    Self::MAX_LAB_TESTS
                ),
            });
        }
        Ok(())
    }
}

/// One synthetic patient chart. Created once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub record_id: uuid::Uuid,
    pub generated_on: NaiveDate,
    pub patient: Patient,
    pub provider: Provider,
    pub insurance: InsuranceInfo,
    pub medical_history: MedicalHistory,
    pub medications: Medications,
    pub vitals: Vec<VitalSigns>,
    pub labs: Vec<LabReport>,
    pub visits: Vec<VisitReport>,
}
