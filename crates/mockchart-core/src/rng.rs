//! Helpers over an injected random source.
//!
//! Nothing in this crate reads a global generator. Callers build one with
//! [`seeded`] and thread `&mut` references through every generator.

use chrono::{Datelike, Duration, NaiveDate};
use rand::{rngs::StdRng, Rng, SeedableRng};
use uuid::Uuid;

/// Deterministic generator for `seed`.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A fresh seed from the thread-local OS-seeded generator.
///
/// Used when no seed is configured. Callers log it so a run can be replayed.
pub fn entropy_seed() -> u64 {
    rand::rng().random()
}

/// True with probability `p`.
pub fn chance<R: Rng>(rng: &mut R, p: f64) -> bool {
    rng.random_bool(p.clamp(0.0, 1.0))
}

/// Uniform pick from a table.
///
/// # Panics
///
/// Panics if `items` is empty. Every caller passes a fixed, non-empty table.
pub fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

/// Weighted pick from `(value, weight)` pairs. Falls back to the first entry
/// when every weight is zero.
///
/// # Panics
///
/// Panics if `items` is empty.
pub fn pick_weighted<T: Copy, R: Rng>(rng: &mut R, items: &[(T, u32)]) -> T {
    let total: u32 = items.iter().map(|(_, w)| *w).sum();
    if total == 0 {
        return items[0].0;
    }
    let mut roll = rng.random_range(0..total);
    for (value, weight) in items {
        if roll < *weight {
            return *value;
        }
        roll -= weight;
    }
    items[items.len() - 1].0
}

/// `n` random decimal digits.
pub fn digits<R: Rng>(rng: &mut R, n: usize) -> String {
    (0..n)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// `n` random uppercase ASCII letters.
pub fn letters<R: Rng>(rng: &mut R, n: usize) -> String {
    (0..n)
        .map(|_| char::from(b'A' + rng.random_range(0..26u8)))
        .collect()
}

/// A v4-shaped UUID built from generator bytes, so it replays with the seed.
pub fn uuid<R: Rng>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.random()).into_uuid()
}

/// US phone number, `(AAA) EEE-NNNN`.
pub fn phone<R: Rng>(rng: &mut R) -> String {
    format!(
        "({}) {}-{}",
        rng.random_range(201..=989),
        rng.random_range(200..=999),
        digits(rng, 4)
    )
}

/// A date between `min_days` and `max_days` (inclusive) before `anchor`.
pub fn days_before<R: Rng>(rng: &mut R, anchor: NaiveDate, min_days: i64, max_days: i64) -> NaiveDate {
    anchor - Duration::days(rng.random_range(min_days..=max_days.max(min_days)))
}

/// A date between `min_days` and `max_days` (inclusive) after `anchor`.
pub fn days_after<R: Rng>(rng: &mut R, anchor: NaiveDate, min_days: i64, max_days: i64) -> NaiveDate {
    anchor + Duration::days(rng.random_range(min_days..=max_days.max(min_days)))
}

/// A date uniformly in `[from, to]`. Returns `from` when the range is empty.
pub fn date_between<R: Rng>(rng: &mut R, from: NaiveDate, to: NaiveDate) -> NaiveDate {
    let span = (to - from).num_days();
    if span <= 0 {
        return from;
    }
    from + Duration::days(rng.random_range(0..=span))
}

/// Dollar amount in `[lo, hi]`, rounded to cents.
pub fn money<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    round_to(rng.random_range(lo..=hi.max(lo)), 2)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Whole years between `date_of_birth` and `today`, one less when the
/// birthday has not yet come around this year.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let dob = date(1980, 6, 15);
        assert_eq!(age_on(dob, date(2026, 6, 14)), 45);
        assert_eq!(age_on(dob, date(2026, 6, 15)), 46);
        assert_eq!(age_on(dob, date(2026, 12, 1)), 46);
    }

    #[test]
    fn test_age_leap_day_birthday() {
        let dob = date(2000, 2, 29);
        assert_eq!(age_on(dob, date(2026, 2, 28)), 25);
        assert_eq!(age_on(dob, date(2026, 3, 1)), 26);
    }

    #[test]
    fn test_round_to_places() {
        assert_eq!(round_to(27.4567, 1), 27.5);
        assert_eq!(round_to(10.005, 0), 10.0);
        assert_eq!(round_to(99.999, 2), 100.0);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = seeded(7);
        let mut b = seeded(7);
        assert_eq!(digits(&mut a, 12), digits(&mut b, 12));
        assert_eq!(uuid(&mut a), uuid(&mut b));
    }

    #[test]
    fn test_pick_weighted_respects_zero_weights() {
        let mut rng = seeded(1);
        for _ in 0..200 {
            assert_eq!(pick_weighted(&mut rng, &[("never", 0), ("always", 5)]), "always");
        }
    }

    #[test]
    fn test_date_between_stays_in_range() {
        let mut rng = seeded(3);
        let from = date(2026, 1, 1);
        let to = date(2026, 1, 10);
        for _ in 0..100 {
            let d = date_between(&mut rng, from, to);
            assert!(d >= from && d <= to);
        }
        assert_eq!(date_between(&mut rng, to, from), to);
    }
}
