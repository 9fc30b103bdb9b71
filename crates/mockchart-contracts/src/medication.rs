//! Current and discontinued medication lists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::history::ConditionKind;

/// A medication the patient is taking now.
///
/// Condition-derived entries carry the condition in `indication` and the
/// purpose text that condition's drug table provides. Supplements and other
/// filler entries have no indication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub route: String,
    pub purpose: String,
    pub indication: Option<ConditionKind>,
    pub prescriber: String,
    pub start_date: NaiveDate,
    pub refills_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscontinuedMedication {
    pub name: String,
    pub dosage: String,
    pub start_date: NaiveDate,
    pub stop_date: NaiveDate,
    pub reason: String,
}

/// Names within `current` are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medications {
    pub current: Vec<CurrentMedication>,
    pub discontinued: Vec<DiscontinuedMedication>,
}
