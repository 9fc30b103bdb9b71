//! # mockchart-core
//!
//! Correlated synthetic medical record and CMS-1500 claim generators.
//!
//! This crate provides:
//! - Per-entity generators (identity, insurance, history, medications,
//!   vitals, labs, visits, claims), each a plain function over an injected
//!   `rand::Rng` and a `today` date
//! - The [`Clock`] seam for pinning "today"
//! - The [`ChartGenerator`] facade that owns a seeded RNG and assembles full
//!   records in a fixed order
//!
//! Correlation flows one way: the problem list from [`history`] drives
//! medications, vitals, labs, visit text and claim diagnoses. Nothing
//! downstream modifies it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mockchart_core::{ChartGenerator, FixedClock};
//! use mockchart_contracts::record::GenerationOptions;
//!
//! let mut generator = ChartGenerator::new(42, Box::new(FixedClock(today)));
//! let record = generator.generate_record(&GenerationOptions::default())?;
//! let claim = generator.generate_claim(Some(&record), None);
//! ```

pub mod claim;
pub mod conditions;
pub mod correlate;
pub mod generator;
pub mod history;
pub mod identity;
pub mod insurance;
pub mod labs;
pub mod medications;
pub mod rng;
pub mod traits;
pub mod visit;
pub mod vitals;

pub use generator::ChartGenerator;
pub use traits::{Clock, FixedClock, SystemClock};
