//! Boolean condition flags derived once per generation call.

use mockchart_contracts::history::{ChronicCondition, ConditionKind};

/// Which condition families are present on a problem list.
///
/// Derived from the tagged [`ConditionKind`] of each condition, never from
/// the display name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionFlags {
    pub hypertension: bool,
    pub copd: bool,
    pub diabetes: bool,
    pub hyperlipidemia: bool,
    pub kidney_disease: bool,
    pub heart_disease: bool,
    pub hypothyroidism: bool,
    pub obesity: bool,
}

impl ConditionFlags {
    pub fn from_conditions(conditions: &[ChronicCondition]) -> Self {
        let mut flags = ConditionFlags::default();
        for condition in conditions {
            match condition.kind {
                ConditionKind::Hypertension => flags.hypertension = true,
                ConditionKind::Copd => flags.copd = true,
                ConditionKind::Type2Diabetes => flags.diabetes = true,
                ConditionKind::Hyperlipidemia => flags.hyperlipidemia = true,
                ConditionKind::ChronicKidneyDisease => flags.kidney_disease = true,
                ConditionKind::CoronaryArteryDisease
                | ConditionKind::HeartFailure
                | ConditionKind::AtrialFibrillation => flags.heart_disease = true,
                ConditionKind::Hypothyroidism => flags.hypothyroidism = true,
                ConditionKind::Obesity => flags.obesity = true,
                _ => {}
            }
        }
        flags
    }
}
