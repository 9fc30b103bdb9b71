//! CMS-1500 claim shape.
//!
//! The order of `Claim::diagnosis_codes` defines the pointer letters: the
//! first code is `A`, the second `B`, and so on. Nothing re-sorts that list
//! after selection.

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::patient::{Address, Gender};

/// ICD-10-CM code shape: letter, digit, alphanumeric, then an optional `.`
/// and one to four alphanumerics (`I10`, `E11.9`, `S93.401A`).
pub const ICD10_PATTERN: &str = r"^[A-Z][0-9][0-9A-Z](\.[0-9A-Z]{1,4})?$";

static ICD10: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(ICD10_PATTERN).ok());

/// True when `code` matches [`ICD10_PATTERN`] exactly.
pub fn is_icd10_code(code: &str) -> bool {
    ICD10.as_ref().is_some_and(|re| re.is_match(code))
}

/// Letter on a service line linking it to a diagnosis by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiagnosisPointer {
    A,
    B,
    C,
    D,
}

impl DiagnosisPointer {
    pub const ALL: [DiagnosisPointer; 4] = [
        DiagnosisPointer::A,
        DiagnosisPointer::B,
        DiagnosisPointer::C,
        DiagnosisPointer::D,
    ];

    /// Pointer for the diagnosis at `index`, if the form has room for it.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        match self {
            DiagnosisPointer::A => 'A',
            DiagnosisPointer::B => 'B',
            DiagnosisPointer::C => 'C',
            DiagnosisPointer::D => 'D',
        }
    }
}

impl fmt::Display for DiagnosisPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Two-digit place-of-service code (box 24B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceOfService {
    #[serde(rename = "11")]
    Office,
    #[serde(rename = "21")]
    InpatientHospital,
    #[serde(rename = "22")]
    OutpatientHospital,
    #[serde(rename = "23")]
    EmergencyRoom,
    #[serde(rename = "24")]
    AmbulatorySurgicalCenter,
}

impl PlaceOfService {
    pub fn code(self) -> &'static str {
        match self {
            PlaceOfService::Office => "11",
            PlaceOfService::InpatientHospital => "21",
            PlaceOfService::OutpatientHospital => "22",
            PlaceOfService::EmergencyRoom => "23",
            PlaceOfService::AmbulatorySurgicalCenter => "24",
        }
    }
}

/// Patient's relationship to the insured (box 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatientRelationship {
    #[serde(rename = "self")]
    SelfInsured,
    Spouse,
    Child,
    Other,
}

/// Coverage category checked in box 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsuranceType {
    Medicare,
    Medicaid,
    #[serde(rename = "Group Health Plan")]
    GroupHealthPlan,
    Other,
}

/// An inclusive date range such as a hospitalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Box 9: the secondary policy, when one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherInsured {
    pub name: String,
    pub policy_number: String,
    pub plan_name: String,
}

/// Box 10: whether the condition relates to employment or an accident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRelatedTo {
    pub employment: bool,
    pub auto_accident: bool,
    /// State where the auto accident happened.
    pub accident_state: Option<String>,
    pub other_accident: bool,
}

/// The billing entity (box 33) or service facility (box 32).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimFacility {
    pub name: String,
    pub address: Address,
    pub phone: String,
    pub npi: String,
}

/// One row of box 24.
///
/// `date_from` and `date_to` both equal the claim's service date.
/// `diagnosis_pointers` is sorted and never names a letter beyond the number
/// of diagnosis codes on the claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub place_of_service: PlaceOfService,
    /// Box 24C.
    pub emergency: bool,
    pub procedure_code: String,
    pub modifier: Option<String>,
    pub description: String,
    pub diagnosis_pointers: Vec<DiagnosisPointer>,
    pub charges: f64,
    pub units: u32,
    pub rendering_npi: String,
}

/// A CMS-1500 professional claim.
///
/// `total_charges` is the rounded sum of the service-line charges and
/// `balance_due` is `total_charges - amount_paid`; neither is sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub claim_number: String,
    pub insurance_type: InsuranceType,
    pub insured_id: String,
    pub patient_name: String,
    pub patient_date_of_birth: NaiveDate,
    pub patient_gender: Gender,
    pub patient_address: Address,
    pub patient_relationship: PatientRelationship,
    pub insured_name: String,
    pub insured_address: Address,
    pub insured_policy_group: String,
    pub insurance_plan_name: String,
    pub other_insured: Option<OtherInsured>,
    pub condition_related_to: ConditionRelatedTo,

    pub date_of_illness: NaiveDate,
    pub hospitalization: Option<DateWindow>,
    pub unable_to_work: Option<DateWindow>,
    pub service_date: NaiveDate,
    pub provider_signature_date: NaiveDate,
    pub patient_signature_date: NaiveDate,

    pub prior_authorization_number: Option<String>,
    pub diagnosis_codes: Vec<String>,
    pub service_lines: Vec<ServiceLine>,

    pub federal_tax_id: String,
    pub patient_account_number: String,
    pub accept_assignment: bool,
    pub total_charges: f64,
    pub amount_paid: f64,
    pub balance_due: f64,

    pub rendering_provider: String,
    pub service_facility: ClaimFacility,
    pub billing_provider: ClaimFacility,
}

impl Claim {
    /// Diagnosis code a pointer refers to, if the claim lists that many.
    pub fn diagnosis_for(&self, pointer: DiagnosisPointer) -> Option<&str> {
        self.diagnosis_codes.get(pointer.index()).map(String::as_str)
    }
}
