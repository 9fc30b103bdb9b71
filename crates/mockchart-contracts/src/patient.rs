//! Identity, address and contact types for patients, providers and facilities.
//!
//! These are the leaf entities of a record. Every other entity either embeds
//! them (claims copy names and addresses) or is generated alongside them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Administrative gender as printed on claim forms (box 3 / box 11a).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Single-letter code used on the CMS-1500.
    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

/// A US postal address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    pub zip_code: String,
}

/// Someone to call when the patient cannot be reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

/// How the patient can be reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub emergency_contact: EmergencyContact,
}

/// The patient's preferred retail pharmacy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pharmacy {
    pub name: String,
    pub phone: String,
    pub address: Address,
}

/// The person the record is about.
///
/// `age` is always derived from `date_of_birth` relative to the generation
/// date. It is stored so presentation collaborators never have to recompute it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub first_name: String,
    pub middle_initial: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub age: u32,
    pub gender: Gender,
    /// Formatted `AAA-GG-SSSS`.
    pub ssn: String,
    /// Medical record number.
    pub mrn: String,
    pub account_number: String,
    pub address: Address,
    pub contact: Contact,
    pub pharmacy: Option<Pharmacy>,
}

impl Patient {
    /// `First Last`, the form compared against the insurance subscriber name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// `LAST, FIRST M` as printed in CMS-1500 box 2.
    pub fn claim_name(&self) -> String {
        format!(
            "{}, {} {}",
            self.last_name.to_uppercase(),
            self.first_name.to_uppercase(),
            self.middle_initial
        )
    }
}

/// Closed vocabulary of provider specialties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialty {
    #[serde(rename = "Family Medicine")]
    FamilyMedicine,
    #[serde(rename = "Internal Medicine")]
    InternalMedicine,
    Cardiology,
    Endocrinology,
    Pulmonology,
    Nephrology,
    #[serde(rename = "Emergency Medicine")]
    EmergencyMedicine,
    Gastroenterology,
}

impl Specialty {
    pub const ALL: [Specialty; 8] = [
        Specialty::FamilyMedicine,
        Specialty::InternalMedicine,
        Specialty::Cardiology,
        Specialty::Endocrinology,
        Specialty::Pulmonology,
        Specialty::Nephrology,
        Specialty::EmergencyMedicine,
        Specialty::Gastroenterology,
    ];
}

/// The practice or hospital where services are rendered and billed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub name: String,
    pub address: Address,
    pub phone: String,
    pub fax: String,
    pub npi: String,
}

/// The rendering clinician.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub first_name: String,
    pub last_name: String,
    /// Post-nominal credentials, e.g. `MD`.
    pub credentials: String,
    pub npi: String,
    pub specialty: Specialty,
    pub phone: String,
    pub address: Address,
    /// Employer identification number, `NN-NNNNNNN`.
    pub tax_id: String,
    pub facility: Facility,
}

impl Provider {
    /// `First Last, MD` style display name.
    pub fn display_name(&self) -> String {
        format!("{} {}, {}", self.first_name, self.last_name, self.credentials)
    }
}
