//! Loading, validating and applying a [`GeneratorConfig`].

use std::path::Path;

use tracing::{debug, warn};

use mockchart_contracts::{
    claim::is_icd10_code,
    error::{MockchartError, MockchartResult},
};
use mockchart_core::{traits::Clock, ChartGenerator, FixedClock, SystemClock};

use crate::settings::GeneratorConfig;

impl GeneratorConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `MockchartError::ConfigError` if the TOML is malformed or does
    /// not match the configuration schema.
    pub fn from_toml_str(s: &str) -> MockchartResult<Self> {
        toml::from_str(s).map_err(|e| MockchartError::ConfigError {
            reason: format!("failed to parse generator TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as TOML.
    pub fn from_file(path: &Path) -> MockchartResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MockchartError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check record counts and diagnosis codes.
    pub fn validate(&self) -> MockchartResult<()> {
        self.record
            .validate()
            .map_err(|e| MockchartError::ConfigError {
                reason: e.to_string(),
            })?;

        for code in &self.claim.diagnosis_pool {
            if !is_icd10_code(code) {
                warn!(code = %code, "rejecting malformed diagnosis code");
                return Err(MockchartError::ConfigError {
                    reason: format!("diagnosis code '{}' is not ICD-10 shaped", code),
                });
            }
        }
        Ok(())
    }

    /// The configured pool, or `None` when it is empty.
    pub fn diagnosis_pool(&self) -> Option<&[String]> {
        (!self.claim.diagnosis_pool.is_empty()).then_some(self.claim.diagnosis_pool.as_slice())
    }

    /// Validate and build a generator from this configuration.
    pub fn build_generator(&self) -> MockchartResult<ChartGenerator> {
        self.validate()?;
        let clock: Box<dyn Clock> = match self.today {
            Some(date) => Box::new(FixedClock(date)),
            None => Box::new(SystemClock),
        };
        let generator = match self.seed {
            Some(seed) => ChartGenerator::new(seed, clock),
            None => ChartGenerator::from_entropy(clock),
        };
        debug!(
            seed = generator.seed(),
            today = %generator.today(),
            "generator built from config"
        );
        Ok(generator)
    }
}
