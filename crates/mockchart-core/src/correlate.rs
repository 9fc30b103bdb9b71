//! Range-based sampling shared by the vitals and lab correlators.
//!
//! A parameter has a normal range `[min, max]`, a widened sampling window
//! `[floor, ceiling]` for abnormal values and critical thresholds. Sampling
//! runs in three steps:
//!
//! 1. Decide normal vs. abnormal. A relevant condition raises the abnormal
//!    probability from `baseline_abnormal` to `biased_abnormal`.
//! 2. If abnormal, pick a direction (a condition may force it) and sample in
//!    the widened window beyond the boundary.
//! 3. Otherwise sample uniformly within `[min, max]`.
//!
//! The flag is computed from the rounded value with [`classify`], so a value
//! and its flag always agree.

use rand::Rng;

use mockchart_contracts::clinical::{Reading, ResultFlag};

use crate::rng::{chance, round_to};

/// Side of the normal range an abnormal value falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    High,
    Low,
}

/// Outcome of the normal/abnormal coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Normal,
    Abnormal(Direction),
}

/// Condition influence on a single parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bias {
    pub active: bool,
    /// Direction forced while the bias is active.
    pub direction: Option<Direction>,
}

impl Bias {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn when(active: bool, direction: Direction) -> Self {
        Self {
            active,
            direction: Some(direction),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub min: f64,
    pub max: f64,
    pub floor: f64,
    pub ceiling: f64,
    pub critical_low: f64,
    pub critical_high: f64,
    pub baseline_abnormal: f64,
    pub biased_abnormal: f64,
    pub decimals: u32,
}

impl ParameterSpec {
    /// Normal range `[min, max]` with the default widening: abnormal values
    /// reach 0.7× min / 1.3× max, critical beyond 0.8× min / 1.2× max.
    pub fn new(min: f64, max: f64, decimals: u32) -> Self {
        Self {
            min,
            max,
            floor: min * 0.7,
            ceiling: max * 1.3,
            critical_low: min * 0.8,
            critical_high: max * 1.2,
            baseline_abnormal: 0.15,
            biased_abnormal: 0.5,
            decimals,
        }
    }

    pub fn window(mut self, floor: f64, ceiling: f64) -> Self {
        self.floor = floor;
        self.ceiling = ceiling;
        self
    }

    pub fn critical(mut self, low: f64, high: f64) -> Self {
        self.critical_low = low;
        self.critical_high = high;
        self
    }

    pub fn abnormal(mut self, baseline: f64, biased: f64) -> Self {
        self.baseline_abnormal = baseline;
        self.biased_abnormal = biased;
        self
    }

    fn step(&self) -> f64 {
        10f64.powi(-(self.decimals as i32))
    }

    /// `min - max` with the parameter's precision, e.g. `70 - 99`.
    pub fn reference_range(&self) -> String {
        let d = self.decimals as usize;
        format!("{:.d$} - {:.d$}", self.min, self.max)
    }
}

/// Flag for `value` relative to the spec's ranges.
pub fn classify(value: f64, spec: &ParameterSpec) -> ResultFlag {
    if value > spec.critical_high || value < spec.critical_low {
        ResultFlag::Critical
    } else if value > spec.max {
        ResultFlag::High
    } else if value < spec.min {
        ResultFlag::Low
    } else {
        ResultFlag::Normal
    }
}

/// Flip the normal/abnormal coin for one parameter.
pub fn decide<R: Rng>(rng: &mut R, spec: &ParameterSpec, bias: Bias) -> Decision {
    let p = if bias.active {
        spec.biased_abnormal
    } else {
        spec.baseline_abnormal
    };
    if !chance(rng, p) {
        return Decision::Normal;
    }

    let can_go_high = spec.ceiling > spec.max;
    let can_go_low = spec.floor < spec.min;
    let direction = match bias.direction.filter(|_| bias.active) {
        Some(forced) => forced,
        None if can_go_high && !can_go_low => Direction::High,
        None if can_go_low && !can_go_high => Direction::Low,
        None => {
            if chance(rng, 0.5) {
                Direction::High
            } else {
                Direction::Low
            }
        }
    };
    Decision::Abnormal(direction)
}

/// Sample a rounded value consistent with `decision`.
pub fn sample<R: Rng>(rng: &mut R, spec: &ParameterSpec, decision: Decision) -> f64 {
    let step = spec.step();
    let (lo, hi) = match decision {
        Decision::Normal => (spec.min, spec.max),
        Decision::Abnormal(Direction::High) => (spec.max + step, spec.ceiling),
        Decision::Abnormal(Direction::Low) => (spec.floor, spec.min - step),
    };
    let value = if hi > lo { rng.random_range(lo..=hi) } else { lo };
    round_to(value, spec.decimals)
}

/// Decide, sample and classify in one call.
pub fn correlated<R: Rng>(rng: &mut R, spec: &ParameterSpec, bias: Bias) -> Reading {
    let decision = decide(rng, spec, bias);
    let value = sample(rng, spec, decision);
    Reading {
        value,
        flag: classify(value, spec),
    }
}

/// Categorical result from an ordered option list whose first entry is the
/// normal finding: 90% of draws return it, the rest pick uniformly from the
/// remaining options and are flagged `Abnormal`.
pub fn categorical<R: Rng>(rng: &mut R, options: &[&str]) -> (String, ResultFlag) {
    match options.split_first() {
        Some((normal, rest)) if rest.is_empty() || chance(rng, 0.9) => {
            (normal.to_string(), ResultFlag::Normal)
        }
        Some((_, rest)) => {
            let value = rest[rng.random_range(0..rest.len())];
            (value.to_string(), ResultFlag::Abnormal)
        }
        None => (String::new(), ResultFlag::Normal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    fn glucose() -> ParameterSpec {
        ParameterSpec::new(70.0, 99.0, 0)
    }

    #[test]
    fn test_classify_boundaries() {
        let spec = glucose();
        assert_eq!(classify(70.0, &spec), ResultFlag::Normal);
        assert_eq!(classify(99.0, &spec), ResultFlag::Normal);
        assert_eq!(classify(100.0, &spec), ResultFlag::High);
        assert_eq!(classify(69.0, &spec), ResultFlag::Low);
        // Critical beyond 1.2x max and below 0.8x min.
        assert_eq!(classify(119.0, &spec), ResultFlag::Critical);
        assert_eq!(classify(55.0, &spec), ResultFlag::Critical);
    }

    #[test]
    fn test_forced_direction_only_goes_high() {
        let mut rng = seeded(11);
        let spec = glucose().abnormal(0.15, 1.0);
        for _ in 0..500 {
            let reading = correlated(&mut rng, &spec, Bias::when(true, Direction::High));
            assert!(reading.value > spec.max, "value {} not above max", reading.value);
            assert!(reading.value <= spec.ceiling.round());
            assert!(matches!(reading.flag, ResultFlag::High | ResultFlag::Critical));
        }
    }

    #[test]
    fn test_normal_decision_stays_in_range() {
        let mut rng = seeded(5);
        let spec = glucose();
        for _ in 0..500 {
            let v = sample(&mut rng, &spec, Decision::Normal);
            assert!((spec.min..=spec.max).contains(&v));
            assert_eq!(classify(v, &spec), ResultFlag::Normal);
        }
    }

    #[test]
    fn test_bias_raises_abnormal_rate() {
        let spec = glucose().abnormal(0.15, 0.6);
        let count = |active: bool| {
            let mut rng = seeded(99);
            (0..4000)
                .filter(|_| {
                    correlated(&mut rng, &spec, Bias::when(active, Direction::High))
                        .flag
                        .is_abnormal()
                })
                .count()
        };
        let baseline = count(false);
        let biased = count(true);
        assert!(baseline > 400 && baseline < 800, "baseline {baseline}");
        assert!(biased > 2100 && biased < 2700, "biased {biased}");
    }

    #[test]
    fn test_one_sided_window_never_crosses() {
        // Oxygen saturation cannot exceed 100.
        let spec = ParameterSpec::new(95.0, 100.0, 0)
            .window(84.0, 100.0)
            .abnormal(1.0, 1.0);
        let mut rng = seeded(2);
        for _ in 0..300 {
            let r = correlated(&mut rng, &spec, Bias::none());
            assert!(r.value < 95.0);
        }
    }

    #[test]
    fn test_categorical_first_option_dominates() {
        let mut rng = seeded(42);
        let options = ["Yellow", "Amber", "Red"];
        let normal = (0..2000)
            .filter(|_| categorical(&mut rng, &options).1 == ResultFlag::Normal)
            .count();
        assert!(normal > 1700 && normal < 1900, "normal {normal}");

        let (value, flag) = categorical(&mut rng, &["Negative"]);
        assert_eq!((value.as_str(), flag), ("Negative", ResultFlag::Normal));
    }

    #[test]
    fn test_reference_range_uses_precision() {
        assert_eq!(ParameterSpec::new(0.6, 1.2, 2).reference_range(), "0.60 - 1.20");
        assert_eq!(glucose().reference_range(), "70 - 99");
    }
}
