//! Content fingerprints for generated records.
//!
//! The fingerprint is the SHA-256 of the record's compact JSON encoding,
//! as a lowercase 64-character hex string. Two runs with the same seed and
//! date produce the same fingerprint.

use sha2::{Digest, Sha256};

use mockchart_contracts::{claim::Claim, error::MockchartResult, record::Record};

pub fn fingerprint(record: &Record) -> MockchartResult<String> {
    Ok(digest(&serde_json::to_vec(record)?))
}

pub fn claim_fingerprint(claim: &Claim) -> MockchartResult<String> {
    Ok(digest(&serde_json::to_vec(claim)?))
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
