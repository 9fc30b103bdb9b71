//! Claim date chronology.
//!
//! Each stage's window is derived from the stage before it, so the ordering
//! `illness <= service <= provider signature <= patient signature` holds by
//! construction. Optional windows start on or after the illness date.

use chrono::NaiveDate;
use rand::Rng;

use mockchart_contracts::claim::DateWindow;

use crate::rng::{chance, days_after, days_before};

const HOSPITALIZATION_PROBABILITY: f64 = 0.1;
const UNABLE_TO_WORK_PROBABILITY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimDates {
    pub date_of_illness: NaiveDate,
    pub hospitalization: Option<DateWindow>,
    pub unable_to_work: Option<DateWindow>,
    pub service_date: NaiveDate,
    pub provider_signature_date: NaiveDate,
    pub patient_signature_date: NaiveDate,
}

pub fn generate_dates<R: Rng>(rng: &mut R, today: NaiveDate) -> ClaimDates {
    let date_of_illness = days_before(rng, today, 15, 45);

    let hospitalization = chance(rng, HOSPITALIZATION_PROBABILITY).then(|| {
        let from = days_after(rng, date_of_illness, 5, 15);
        DateWindow {
            from,
            to: days_after(rng, from, 0, 7),
        }
    });

    let unable_to_work = chance(rng, UNABLE_TO_WORK_PROBABILITY).then(|| {
        let from = days_after(rng, date_of_illness, 0, 10);
        DateWindow {
            from,
            to: days_after(rng, from, 0, 14),
        }
    });

    let mut service_date = days_before(rng, today, 7, 30);
    if service_date < date_of_illness {
        service_date = days_after(rng, date_of_illness, 1, 7);
    }
    let provider_signature_date = days_after(rng, service_date, 0, 3);
    let patient_signature_date = days_after(rng, provider_signature_date, 0, 2);

    ClaimDates {
        date_of_illness,
        hospitalization,
        unable_to_work,
        service_date,
        provider_signature_date,
        patient_signature_date,
    }
}
