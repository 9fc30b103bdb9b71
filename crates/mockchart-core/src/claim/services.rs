//! Service-line selection for a claim.
//!
//! Every diagnosis maps to a short list of candidate procedures. Candidates
//! carry the pointer of the diagnosis that justified them; the final lines
//! keep one candidate per diagnosis and fill the rest at random.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rand::{seq::IndexedRandom, Rng};
use tracing::debug;

use mockchart_contracts::claim::{DiagnosisPointer, PlaceOfService, ServiceLine};

use crate::rng::{chance, money};

pub const MAX_SERVICE_LINES: usize = 4;
const MIN_CANDIDATES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceEntry {
    pub code: &'static str,
    pub description: &'static str,
    pub charge_min: f64,
    pub charge_max: f64,
}

const fn svc(code: &'static str, description: &'static str, charge_min: f64, charge_max: f64) -> ServiceEntry {
    ServiceEntry {
        code,
        description,
        charge_min,
        charge_max,
    }
}

const OFFICE_VISIT_LOW: ServiceEntry = svc("99212", "Office visit, established patient, straightforward", 75.0, 110.0);
const OFFICE_VISIT: ServiceEntry = svc("99213", "Office visit, established patient, low complexity", 110.0, 160.0);
const OFFICE_VISIT_MODERATE: ServiceEntry = svc("99214", "Office visit, established patient, moderate complexity", 160.0, 230.0);
const OFFICE_VISIT_HIGH: ServiceEntry = svc("99215", "Office visit, established patient, high complexity", 220.0, 310.0);
const ED_VISIT_LOW: ServiceEntry = svc("99283", "Emergency department visit, moderate severity", 250.0, 450.0);
const ED_VISIT_MODERATE: ServiceEntry = svc("99284", "Emergency department visit, high severity", 450.0, 750.0);
const ED_VISIT_HIGH: ServiceEntry = svc("99285", "Emergency department visit, high severity with threat to life", 750.0, 1400.0);
const HOSPITAL_ADMIT: ServiceEntry = svc("99223", "Initial hospital inpatient care, high complexity", 380.0, 700.0);
const ECG: ServiceEntry = svc("93000", "Electrocardiogram, routine with interpretation", 45.0, 95.0);
const ECHO: ServiceEntry = svc("93306", "Transthoracic echocardiogram, complete", 450.0, 1100.0);
const CMP: ServiceEntry = svc("80053", "Comprehensive metabolic panel", 35.0, 80.0);
const BMP: ServiceEntry = svc("80048", "Basic metabolic panel", 25.0, 60.0);
const CBC: ServiceEntry = svc("85025", "Complete blood count with differential", 20.0, 55.0);
const LIPID: ServiceEntry = svc("80061", "Lipid panel", 30.0, 75.0);
const A1C: ServiceEntry = svc("83036", "Hemoglobin A1c", 25.0, 60.0);
const GLUCOSE: ServiceEntry = svc("82947", "Glucose, quantitative, blood", 12.0, 30.0);
const TSH: ServiceEntry = svc("84443", "Thyroid stimulating hormone", 35.0, 85.0);
const URINALYSIS: ServiceEntry = svc("81001", "Urinalysis, automated with microscopy", 15.0, 40.0);
const URINE_CULTURE: ServiceEntry = svc("87086", "Urine culture, quantitative colony count", 30.0, 70.0);
const BLOOD_CULTURE: ServiceEntry = svc("87040", "Blood culture for bacteria", 45.0, 95.0);
const STREP_TEST: ServiceEntry = svc("87880", "Rapid strep antigen test", 20.0, 45.0);
const CREATININE: ServiceEntry = svc("82565", "Creatinine, blood", 12.0, 30.0);
const BNP: ServiceEntry = svc("83880", "Natriuretic peptide (BNP)", 45.0, 110.0);
const TROPONIN: ServiceEntry = svc("84484", "Troponin, quantitative", 40.0, 95.0);
const PT_INR: ServiceEntry = svc("85610", "Prothrombin time (PT/INR)", 12.0, 35.0);
const SPIROMETRY: ServiceEntry = svc("94010", "Spirometry", 60.0, 130.0);
const SPIROMETRY_BRONCHODILATOR: ServiceEntry = svc("94060", "Spirometry before and after bronchodilator", 90.0, 180.0);
const CHEST_XRAY_1: ServiceEntry = svc("71045", "Chest X-ray, single view", 60.0, 140.0);
const CHEST_XRAY_2: ServiceEntry = svc("71046", "Chest X-ray, two views", 80.0, 180.0);
const CT_HEAD: ServiceEntry = svc("70450", "CT head without contrast", 350.0, 900.0);
const KNEE_XRAY: ServiceEntry = svc("73562", "X-ray knee, three views", 70.0, 160.0);
const ANKLE_XRAY: ServiceEntry = svc("73610", "X-ray ankle, three views", 70.0, 150.0);
const LUMBAR_XRAY: ServiceEntry = svc("72100", "X-ray lumbosacral spine, two or three views", 80.0, 170.0);
const CT_ABDOMEN: ServiceEntry = svc("74177", "CT abdomen and pelvis with contrast", 600.0, 1500.0);
const ARTHROCENTESIS: ServiceEntry = svc("20610", "Arthrocentesis, major joint", 120.0, 260.0);
const EGD: ServiceEntry = svc("43235", "Upper GI endoscopy, diagnostic", 700.0, 1600.0);
const COLONOSCOPY: ServiceEntry = svc("45378", "Colonoscopy, diagnostic", 900.0, 2200.0);
const MOOD_SCREEN: ServiceEntry = svc("96127", "Brief emotional/behavioral assessment", 10.0, 30.0);
const NUTRITION_THERAPY: ServiceEntry = svc("97802", "Medical nutrition therapy, initial, each 15 minutes", 35.0, 80.0);
const VENIPUNCTURE: ServiceEntry = svc("36415", "Routine venipuncture", 8.0, 20.0);

/// Generic services for diagnoses without a table entry.
pub const DEFAULT_SERVICES: &[ServiceEntry] = &[OFFICE_VISIT, BMP, CBC, VENIPUNCTURE];

/// Candidate services for a diagnosis, or `None` when it has no entry.
pub fn services_for(diagnosis: &str) -> Option<&'static [ServiceEntry]> {
    let services: &'static [ServiceEntry] = match diagnosis {
        "I10" => &[OFFICE_VISIT, OFFICE_VISIT_MODERATE, ECG],
        "E11.9" => &[A1C, GLUCOSE],
        "E78.5" => &[LIPID, OFFICE_VISIT],
        "J44.9" => &[SPIROMETRY, OFFICE_VISIT_MODERATE, CHEST_XRAY_2],
        "J45.909" => &[SPIROMETRY_BRONCHODILATOR, OFFICE_VISIT],
        "N18.30" => &[CMP, CREATININE, OFFICE_VISIT_MODERATE],
        "I25.10" => &[ECG, ECHO, OFFICE_VISIT_MODERATE],
        "I50.9" => &[ECHO, BNP, OFFICE_VISIT_HIGH],
        "I48.91" => &[ECG, PT_INR, OFFICE_VISIT_MODERATE],
        "E03.9" => &[TSH, OFFICE_VISIT],
        "F32.9" => &[OFFICE_VISIT_MODERATE, MOOD_SCREEN],
        "F41.1" => &[OFFICE_VISIT, MOOD_SCREEN],
        "M19.90" => &[KNEE_XRAY, ARTHROCENTESIS, OFFICE_VISIT],
        "K21.9" => &[EGD, OFFICE_VISIT],
        "E66.9" => &[OFFICE_VISIT_MODERATE, NUTRITION_THERAPY],
        "G43.909" => &[CT_HEAD, OFFICE_VISIT_MODERATE],
        "J06.9" => &[OFFICE_VISIT, STREP_TEST],
        "J02.9" => &[STREP_TEST, OFFICE_VISIT_LOW],
        "J18.9" => &[CHEST_XRAY_2, OFFICE_VISIT_MODERATE, CBC],
        "N39.0" => &[URINALYSIS, URINE_CULTURE, OFFICE_VISIT],
        "R07.9" => &[ECG, ED_VISIT_HIGH, CHEST_XRAY_1],
        "I21.9" => &[ED_VISIT_HIGH, ECG, TROPONIN, HOSPITAL_ADMIT],
        "R10.9" => &[CT_ABDOMEN, ED_VISIT_MODERATE],
        "M54.50" => &[LUMBAR_XRAY, OFFICE_VISIT],
        "S93.401A" => &[ANKLE_XRAY, ED_VISIT_LOW],
        "R51.9" => &[OFFICE_VISIT, CT_HEAD],
        "Z12.11" => &[COLONOSCOPY],
        "A41.9" => &[ED_VISIT_HIGH, BLOOD_CULTURE, CBC, HOSPITAL_ADMIT],
        "I63.9" => &[CT_HEAD, ED_VISIT_HIGH, HOSPITAL_ADMIT],
        "R06.02" => &[CHEST_XRAY_2, SPIROMETRY, OFFICE_VISIT_MODERATE],
        "K57.30" => &[COLONOSCOPY, CT_ABDOMEN],
        _ => return None,
    };
    Some(services)
}

/// Evaluation and management codes, 99202 through 99499.
pub fn is_evaluation_management(code: &str) -> bool {
    code.parse::<u32>()
        .map(|n| (99202..=99499).contains(&n))
        .unwrap_or(false)
}

const IMAGING_CODES: &[&str] = &[
    "71045", "71046", "70450", "73562", "73610", "72100", "74177", "93306",
];

/// Place of service for a procedure code.
///
/// Emergency department visits bill to the emergency room, hospital
/// admissions to inpatient, imaging to outpatient hospital and endoscopy to
/// an ambulatory surgical center. Everything else is office.
pub fn place_of_service(code: &str) -> PlaceOfService {
    match code {
        "99281" | "99282" | "99283" | "99284" | "99285" => PlaceOfService::EmergencyRoom,
        "99221" | "99222" | "99223" => PlaceOfService::InpatientHospital,
        "45378" | "43235" => PlaceOfService::AmbulatorySurgicalCenter,
        c if IMAGING_CODES.contains(&c) => PlaceOfService::OutpatientHospital,
        _ => PlaceOfService::Office,
    }
}

/// A service under consideration and the pointers that justify it.
#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    entry: ServiceEntry,
    pointers: Vec<DiagnosisPointer>,
    /// Diagnoses for which this is the first candidate.
    anchors: usize,
}

fn gather_candidates<R: Rng>(rng: &mut R, diagnoses: &[String]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();

    for (index, code) in diagnoses.iter().enumerate() {
        let Some(pointer) = DiagnosisPointer::from_index(index) else {
            break;
        };
        let table = services_for(code).unwrap_or(DEFAULT_SERVICES);
        let available: Vec<&ServiceEntry> = table
            .iter()
            .filter(|s| !candidates.iter().any(|c| c.entry.code == s.code))
            .collect();

        if available.is_empty() {
            // Everything this diagnosis supports is already billed; point
            // the first matching line at it too.
            if let Some(existing) = candidates
                .iter_mut()
                .find(|c| table.iter().any(|s| s.code == c.entry.code))
            {
                existing.pointers.push(pointer);
                existing.anchors += 1;
            }
            continue;
        }

        let count = rng.random_range(1..=2usize).min(available.len());
        let picks: Vec<ServiceEntry> = available
            .choose_multiple(rng, count)
            .map(|s| **s)
            .collect();
        for (n, entry) in picks.into_iter().enumerate() {
            candidates.push(Candidate {
                entry,
                pointers: vec![pointer],
                anchors: usize::from(n == 0),
            });
        }
    }

    for entry in DEFAULT_SERVICES {
        if candidates.len() >= MIN_CANDIDATES {
            break;
        }
        if candidates.iter().any(|c| c.entry.code == entry.code) {
            continue;
        }
        candidates.push(Candidate {
            entry: *entry,
            pointers: vec![DiagnosisPointer::A],
            anchors: 0,
        });
    }
    candidates
}

/// Indices of the final lines: every anchor, then random fill up to a
/// random count of 1 to 4. Returned in candidate order.
fn select_final<R: Rng>(rng: &mut R, candidates: &[Candidate]) -> Vec<usize> {
    if candidates.is_empty() {
        return Vec::new();
    }
    let upper = candidates.len().min(MAX_SERVICE_LINES);
    let target = rng.random_range(1..=upper);

    let mut selected: BTreeSet<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.anchors > 0)
        .map(|(i, _)| i)
        .collect();
    let rest: Vec<usize> = (0..candidates.len())
        .filter(|i| !selected.contains(i))
        .collect();
    let missing = target.saturating_sub(selected.len());
    selected.extend(rest.choose_multiple(rng, missing).copied());
    selected.into_iter().collect()
}

fn extra_pointers<R: Rng>(
    rng: &mut R,
    code: &str,
    pointers: &mut Vec<DiagnosisPointer>,
    diagnosis_count: usize,
) {
    let others: Vec<DiagnosisPointer> = DiagnosisPointer::ALL
        .into_iter()
        .take(diagnosis_count)
        .filter(|p| !pointers.contains(p))
        .collect();
    if others.is_empty() {
        return;
    }
    if is_evaluation_management(code) {
        let extra = rng.random_range(0..=2);
        pointers.extend(others.choose_multiple(rng, extra).copied());
    } else if matches!(code, "80053" | "85025") && chance(rng, 0.3) {
        pointers.extend(others.choose(rng).copied());
    }
}

/// Build the claim's service lines from its ordered diagnosis codes.
pub fn build_service_lines<R: Rng>(
    rng: &mut R,
    diagnoses: &[String],
    service_date: NaiveDate,
    rendering_npi: &str,
) -> Vec<ServiceLine> {
    let candidates = gather_candidates(rng, diagnoses);
    let selected = select_final(rng, &candidates);
    let diagnosis_count = diagnoses.len().min(DiagnosisPointer::ALL.len());

    let has_procedure = selected
        .iter()
        .any(|&i| !is_evaluation_management(candidates[i].entry.code));

    let lines: Vec<ServiceLine> = selected
        .into_iter()
        .map(|i| {
            let candidate = &candidates[i];
            let entry = candidate.entry;
            let place_of_service = place_of_service(entry.code);
            let emergency = place_of_service == PlaceOfService::EmergencyRoom && chance(rng, 0.3);

            let mut pointers = candidate.pointers.clone();
            extra_pointers(rng, entry.code, &mut pointers, diagnosis_count);
            pointers.sort();
            pointers.dedup();

            let is_em = is_evaluation_management(entry.code);
            ServiceLine {
                date_from: service_date,
                date_to: service_date,
                place_of_service,
                emergency,
                procedure_code: entry.code.to_string(),
                modifier: (is_em && has_procedure).then(|| "25".to_string()),
                description: entry.description.to_string(),
                diagnosis_pointers: pointers,
                charges: money(rng, entry.charge_min, entry.charge_max),
                units: 1,
                rendering_npi: rendering_npi.to_string(),
            }
        })
        .collect();
    debug!(
        candidates = candidates.len(),
        lines = lines.len(),
        "service lines selected"
    );
    lines
}
