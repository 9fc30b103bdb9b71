//! Seams the generators are parameterized over.
//!
//! Randomness is passed explicitly as `&mut impl rand::Rng`. The only other
//! ambient input is the current date, supplied through [`Clock`] so tests can
//! pin "today" and get byte-identical output for a given seed.

use chrono::{Local, NaiveDate};

/// Source of the generation date.
///
/// Every relative date in a record (ages, "recent" visits, claim chronology)
/// is computed from the value returned here, read once per generation call.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Reads the local calendar date from the system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
