//! Configuration schema.
//!
//! Every field has a default, so an empty document is a valid configuration:
//! entropy seed, system clock, default record options and no diagnosis pool.
//!
//! ```toml
//! seed = 42
//! today = "2026-03-01"
//!
//! [record]
//! complexity = "high"
//! visit_count = 4
//! lab_test_count = 3
//! include_secondary_insurance = true
//! distinct_subscriber = false
//!
//! [claim]
//! diagnosis_pool = ["I10", "E11.9"]
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mockchart_contracts::record::GenerationOptions;

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Fixed seed. When absent a seed is drawn from OS entropy and logged.
    pub seed: Option<u64>,

    /// Pinned generation date, `YYYY-MM-DD`. When absent the system date is
    /// used.
    pub today: Option<NaiveDate>,

    /// Options for full record generation.
    pub record: GenerationOptions,

    pub claim: ClaimConfig,
}

/// Claim generation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimConfig {
    /// Diagnosis codes to bill, in pointer order. Empty means "choose from
    /// the record or the built-in vocabulary".
    pub diagnosis_pool: Vec<String>,
}
