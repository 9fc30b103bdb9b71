//! Insurance coverage types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::patient::Gender;

/// Network model of a health plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanType {
    #[serde(rename = "PPO")]
    Ppo,
    #[serde(rename = "HMO")]
    Hmo,
    #[serde(rename = "EPO")]
    Epo,
    #[serde(rename = "POS")]
    Pos,
    #[serde(rename = "HDHP")]
    Hdhp,
}

impl PlanType {
    pub const ALL: [PlanType; 5] = [
        PlanType::Ppo,
        PlanType::Hmo,
        PlanType::Epo,
        PlanType::Pos,
        PlanType::Hdhp,
    ];

    pub fn code(self) -> &'static str {
        match self {
            PlanType::Ppo => "PPO",
            PlanType::Hmo => "HMO",
            PlanType::Epo => "EPO",
            PlanType::Pos => "POS",
            PlanType::Hdhp => "HDHP",
        }
    }
}

/// A single policy with one payer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insurance {
    /// Payer name, drawn from a fixed vocabulary.
    pub provider: String,
    pub plan_type: PlanType,
    pub policy_number: String,
    pub group_number: String,
    pub member_id: String,
    pub payer_phone: String,
    pub effective_date: NaiveDate,
    /// Office-visit copay in dollars.
    pub copay: f64,
    /// Annual deductible in dollars.
    pub deductible: f64,
}

/// Primary coverage, optional secondary coverage and the subscriber who
/// holds the primary policy.
///
/// If `secondary_insurance` is present its `provider` differs from the
/// primary's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceInfo {
    pub primary_insurance: Insurance,
    pub secondary_insurance: Option<Insurance>,
    /// `First Last`, comparable with `Patient::full_name`.
    pub subscriber_name: String,
    pub subscriber_date_of_birth: NaiveDate,
    pub subscriber_gender: Gender,
    pub subscriber_employer: Option<String>,
}

/// A policy holder other than the patient.
///
/// Passed to the insurance generator when the subscriber should differ from
/// the patient (a spouse or parent carrying the family plan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
}

impl Subscriber {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
