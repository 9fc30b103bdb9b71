//! Patient, provider and facility identities.
//!
//! Every field is sampled independently except `Patient::age`, which is
//! computed from the sampled date of birth.

use chrono::NaiveDate;
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName};
use fake::faker::name::en::LastName;
use fake::Fake;
use rand::Rng;
use tracing::debug;

use mockchart_contracts::{
    insurance::Subscriber,
    patient::{
        Address, Contact, EmergencyContact, Facility, Gender, Patient, Pharmacy, Provider,
        Specialty,
    },
};

use crate::rng::{age_on, chance, days_before, digits, phone, pick, pick_weighted};

const MALE_FIRST_NAMES: &[&str] = &[
    "James", "Robert", "John", "Michael", "David", "William", "Richard", "Joseph", "Thomas",
    "Charles", "Daniel", "Matthew", "Anthony", "Mark", "Steven", "Andrew", "Kevin", "Brian",
    "George", "Edward", "Ronald", "Timothy", "Jason", "Ryan", "Gary", "Eric", "Stephen",
    "Larry", "Frank", "Raymond", "Luis", "Carlos", "Wei", "Arjun", "Samuel", "Marcus",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth", "Barbara", "Susan", "Jessica",
    "Sarah", "Karen", "Lisa", "Nancy", "Sandra", "Ashley", "Emily", "Donna", "Michelle",
    "Carol", "Amanda", "Melissa", "Deborah", "Stephanie", "Rebecca", "Laura", "Sharon",
    "Cynthia", "Angela", "Maria", "Rosa", "Mei", "Priya", "Aisha", "Grace", "Hannah",
];

const EMAIL_DOMAINS: &[&str] = &["gmail.com", "yahoo.com", "outlook.com", "icloud.com", "aol.com"];

const EMERGENCY_RELATIONSHIPS: &[&str] = &["Spouse", "Sibling", "Parent", "Child", "Friend"];

const PHARMACY_CHAINS: &[&str] = &[
    "CVS Pharmacy",
    "Walgreens",
    "Rite Aid",
    "Walmart Pharmacy",
    "Costco Pharmacy",
    "Kroger Pharmacy",
];

const CREDENTIALS: &[(&str, u32)] = &[("MD", 60), ("DO", 20), ("NP", 12), ("PA-C", 8)];

const FACILITY_SUFFIXES: &[&str] = &[
    "Medical Center",
    "Family Clinic",
    "Health Partners",
    "Medical Group",
    "Community Hospital",
    "Primary Care Associates",
];

/// The two identities a record starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub patient: Patient,
    pub provider: Provider,
}

/// Generate a patient and the provider who treats them.
pub fn generate_identity<R: Rng>(rng: &mut R, today: NaiveDate) -> Identity {
    let patient = generate_patient(rng, today);
    let provider = generate_provider(rng);
    debug!(
        mrn = %patient.mrn,
        age = patient.age,
        provider_npi = %provider.npi,
        "identity generated"
    );
    Identity { patient, provider }
}

pub fn generate_patient<R: Rng>(rng: &mut R, today: NaiveDate) -> Patient {
    let gender = if chance(rng, 0.5) {
        Gender::Male
    } else {
        Gender::Female
    };
    let first_name = first_name(rng, gender).to_string();
    let last_name: String = LastName().fake_with_rng(rng);
    let middle_initial = crate::rng::letters(rng, 1);

    // Adults only: 18 to 90 years old.
    let date_of_birth = days_before(rng, today, 18 * 365 + 5, 90 * 365);
    let age = age_on(date_of_birth, today);

    let address = generate_address(rng);
    let contact = Contact {
        phone: phone(rng),
        email: email(rng, &first_name, &last_name),
        emergency_contact: EmergencyContact {
            name: format!("{} {}", first_name_any(rng), last_name),
            relationship: pick(rng, EMERGENCY_RELATIONSHIPS).to_string(),
            phone: phone(rng),
        },
    };
    let pharmacy = chance(rng, 0.7).then(|| Pharmacy {
        name: format!("{} #{}", pick(rng, PHARMACY_CHAINS), digits(rng, 4)),
        phone: phone(rng),
        address: address_in(rng, &address.city, &address.state),
    });

    Patient {
        first_name,
        middle_initial,
        last_name,
        date_of_birth,
        age,
        gender,
        ssn: ssn(rng),
        mrn: format!("MRN{}", digits(rng, 8)),
        account_number: format!("ACCT-{}", digits(rng, 7)),
        address,
        contact,
        pharmacy,
    }
}

pub fn generate_provider<R: Rng>(rng: &mut R) -> Provider {
    let gender = if chance(rng, 0.5) {
        Gender::Male
    } else {
        Gender::Female
    };
    let first_name = first_name(rng, gender).to_string();
    let last_name: String = LastName().fake_with_rng(rng);
    let address = generate_address(rng);

    // The facility is generated independently but may share the provider's
    // locality.
    let facility_address = if chance(rng, 0.5) {
        address_in(rng, &address.city, &address.state)
    } else {
        generate_address(rng)
    };
    let facility = Facility {
        name: format!("{} {}", facility_address.city, pick(rng, FACILITY_SUFFIXES)),
        address: facility_address,
        phone: phone(rng),
        fax: phone(rng),
        npi: npi(rng),
    };

    Provider {
        first_name,
        last_name,
        credentials: pick_weighted(rng, CREDENTIALS).to_string(),
        npi: npi(rng),
        specialty: *pick(rng, &Specialty::ALL),
        phone: phone(rng),
        address,
        tax_id: format!("{}-{}", rng.random_range(10..=99), digits(rng, 7)),
        facility,
    }
}

/// A policy holder in the patient's household: same surname, a different
/// first name, old enough to carry a family plan.
pub fn generate_subscriber<R: Rng>(rng: &mut R, today: NaiveDate, patient: &Patient) -> Subscriber {
    let gender = if chance(rng, 0.5) {
        Gender::Male
    } else {
        Gender::Female
    };
    let pool: Vec<&str> = names_for(gender)
        .iter()
        .copied()
        .filter(|n| *n != patient.first_name)
        .collect();
    let first_name = pick(rng, &pool).to_string();
    Subscriber {
        first_name,
        last_name: patient.last_name.clone(),
        date_of_birth: days_before(rng, today, 25 * 365, 80 * 365),
        gender,
    }
}

pub fn generate_address<R: Rng>(rng: &mut R) -> Address {
    let city: String = CityName().fake_with_rng(rng);
    let state: String = StateAbbr().fake_with_rng(rng);
    address_in(rng, &city, &state)
}

/// A new street address in an existing city.
pub fn address_in<R: Rng>(rng: &mut R, city: &str, state: &str) -> Address {
    let number: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    Address {
        street: format!("{number} {street}"),
        city: city.to_string(),
        state: state.to_string(),
        zip_code: format!("{:05}", rng.random_range(1001..=99950)),
    }
}

/// A 10-digit NPI whose last digit is the Luhn check digit over the
/// `80840` card-issuer prefix.
pub fn npi<R: Rng>(rng: &mut R) -> String {
    let base = format!("{}{}", rng.random_range(1..=2), digits(rng, 8));
    let check = luhn_check_digit(&format!("80840{base}"));
    format!("{base}{check}")
}

/// True when `npi` is ten digits with a valid check digit.
pub fn is_valid_npi(npi: &str) -> bool {
    if npi.len() != 10 || !npi.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (base, check) = npi.split_at(9);
    luhn_check_digit(&format!("80840{base}")).to_string() == check
}

/// Luhn check digit for a string of ASCII digits.
fn luhn_check_digit(payload: &str) -> u32 {
    let sum: u32 = payload
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    (10 - sum % 10) % 10
}

fn ssn<R: Rng>(rng: &mut R) -> String {
    // Area numbers 000, 666 and 900-999 are never issued.
    let mut area = rng.random_range(1..=899);
    if area == 666 {
        area = 667;
    }
    format!(
        "{:03}-{:02}-{:04}",
        area,
        rng.random_range(1..=99),
        rng.random_range(1..=9999)
    )
}

fn email<R: Rng>(rng: &mut R, first: &str, last: &str) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase()
    };
    format!(
        "{}.{}{}@{}",
        clean(first),
        clean(last),
        rng.random_range(1..=99),
        pick(rng, EMAIL_DOMAINS)
    )
}

fn names_for(gender: Gender) -> &'static [&'static str] {
    match gender {
        Gender::Male => MALE_FIRST_NAMES,
        Gender::Female => FEMALE_FIRST_NAMES,
    }
}

fn first_name<R: Rng>(rng: &mut R, gender: Gender) -> &'static str {
    *pick(rng, names_for(gender))
}

fn first_name_any<R: Rng>(rng: &mut R) -> &'static str {
    if chance(rng, 0.5) {
        first_name(rng, Gender::Male)
    } else {
        first_name(rng, Gender::Female)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn test_age_is_derived_from_birth_date() {
        let mut rng = seeded(17);
        for _ in 0..200 {
            let patient = generate_patient(&mut rng, today());
            assert_eq!(patient.age, age_on(patient.date_of_birth, today()));
            assert!((18..=90).contains(&patient.age), "age {}", patient.age);
        }
    }

    #[test]
    fn test_first_name_comes_from_gendered_list() {
        let mut rng = seeded(5);
        for _ in 0..100 {
            assert!(MALE_FIRST_NAMES.contains(&first_name(&mut rng, Gender::Male)));
            assert!(FEMALE_FIRST_NAMES.contains(&first_name(&mut rng, Gender::Female)));
        }
    }

    #[test]
    fn test_known_npi_check_digit() {
        // Published CMS example NPI.
        assert!(is_valid_npi("1234567893"));
        assert!(!is_valid_npi("1234567890"));
        assert!(!is_valid_npi("123456789"));
        assert!(!is_valid_npi("12345678a3"));
    }

    #[test]
    fn test_generated_npis_validate() {
        let mut rng = seeded(8);
        for _ in 0..100 {
            let provider = generate_provider(&mut rng);
            assert!(is_valid_npi(&provider.npi), "bad npi {}", provider.npi);
            assert!(is_valid_npi(&provider.facility.npi));
        }
    }

    #[test]
    fn test_ssn_format_excludes_unissued_areas() {
        let mut rng = seeded(23);
        for _ in 0..300 {
            let s = ssn(&mut rng);
            assert_eq!(s.len(), 11);
            let area: u32 = s[..3].parse().unwrap();
            assert!(area != 0 && area != 666 && area < 900);
        }
    }

    #[test]
    fn test_subscriber_differs_from_patient() {
        let mut rng = seeded(4);
        for _ in 0..100 {
            let patient = generate_patient(&mut rng, today());
            let subscriber = generate_subscriber(&mut rng, today(), &patient);
            assert_eq!(subscriber.last_name, patient.last_name);
            assert_ne!(subscriber.full_name(), patient.full_name());
        }
    }

    #[test]
    fn test_pharmacy_shares_patient_city() {
        let mut rng = seeded(31);
        let mut seen = 0;
        for _ in 0..50 {
            let patient = generate_patient(&mut rng, today());
            if let Some(pharmacy) = &patient.pharmacy {
                seen += 1;
                assert_eq!(pharmacy.address.city, patient.address.city);
                assert_eq!(pharmacy.address.state, patient.address.state);
            }
        }
        assert!(seen > 0);
    }
}
