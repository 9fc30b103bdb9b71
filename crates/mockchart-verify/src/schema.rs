//! JSON Schema for the wire form of a CMS-1500 claim.

use serde_json::{json, Value};
use tracing::warn;

use mockchart_contracts::{
    claim::ICD10_PATTERN,
    error::{MockchartError, MockchartResult},
    verify::{VerificationFailure, VerificationReport},
};

const CLAIM_REQUIRED: &[&str] = &[
    "claimNumber",
    "insuranceType",
    "insuredId",
    "patientName",
    "patientDateOfBirth",
    "patientRelationship",
    "insuredName",
    "dateOfIllness",
    "serviceDate",
    "providerSignatureDate",
    "patientSignatureDate",
    "diagnosisCodes",
    "serviceLines",
    "federalTaxId",
    "acceptAssignment",
    "totalCharges",
    "amountPaid",
    "balanceDue",
    "serviceFacility",
    "billingProvider",
];

const SERVICE_LINE_REQUIRED: &[&str] = &[
    "dateFrom",
    "dateTo",
    "placeOfService",
    "emergency",
    "procedureCode",
    "diagnosisPointers",
    "charges",
    "units",
    "renderingNpi",
];

fn address_schema() -> Value {
    json!({
        "type": "object",
        "required": ["street", "city", "state", "zipCode"],
        "properties": {
            "street": { "type": "string", "minLength": 1 },
            "city": { "type": "string", "minLength": 1 },
            "state": { "type": "string", "pattern": "^[A-Z]{2}$" },
            "zipCode": { "type": "string", "pattern": "^[0-9]{5}$" }
        }
    })
}

fn facility_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "address", "phone", "npi"],
        "properties": {
            "name": { "type": "string", "minLength": 1 },
            "address": address_schema(),
            "phone": { "type": "string" },
            "npi": { "type": "string", "pattern": "^[0-9]{10}$" }
        }
    })
}

fn date_schema() -> Value {
    json!({ "type": "string", "format": "date" })
}

fn date_window_schema() -> Value {
    json!({
        "type": ["object", "null"],
        "required": ["from", "to"],
        "properties": {
            "from": date_schema(),
            "to": date_schema()
        }
    })
}

fn diagnosis_codes_schema() -> Value {
    json!({
        "type": "array",
        "minItems": 2,
        "maxItems": 4,
        "uniqueItems": true,
        "items": { "type": "string", "pattern": ICD10_PATTERN }
    })
}

fn service_line_schema() -> Value {
    json!({
        "type": "object",
        "required": SERVICE_LINE_REQUIRED,
        "properties": {
            "dateFrom": date_schema(),
            "dateTo": date_schema(),
            "placeOfService": { "enum": ["11", "21", "22", "23", "24"] },
            "emergency": { "type": "boolean" },
            "procedureCode": { "type": "string", "pattern": "^[0-9A-Z]{5}$" },
            "modifier": { "type": ["string", "null"], "pattern": "^[0-9A-Z]{2}$" },
            "diagnosisPointers": {
                "type": "array",
                "minItems": 1,
                "maxItems": 4,
                "uniqueItems": true,
                "items": { "enum": ["A", "B", "C", "D"] }
            },
            "charges": { "type": "number", "exclusiveMinimum": 0 },
            "units": { "type": "integer", "minimum": 1 },
            "renderingNpi": { "type": "string", "pattern": "^[0-9]{10}$" }
        }
    })
}

/// Structural schema for a serialized [`Claim`](mockchart_contracts::claim::Claim).
pub fn claim_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "CMS-1500 claim",
        "type": "object",
        "required": CLAIM_REQUIRED,
        "properties": {
            "claimNumber": { "type": "string", "minLength": 1 },
            "insuranceType": {
                "enum": ["Medicare", "Medicaid", "Group Health Plan", "Other"]
            },
            "insuredId": { "type": "string", "minLength": 1 },
            "patientName": { "type": "string", "minLength": 1 },
            "patientDateOfBirth": date_schema(),
            "patientAddress": address_schema(),
            "patientRelationship": { "enum": ["self", "spouse", "child", "other"] },
            "insuredName": { "type": "string", "minLength": 1 },
            "insuredAddress": address_schema(),
            "dateOfIllness": date_schema(),
            "hospitalization": date_window_schema(),
            "unableToWork": date_window_schema(),
            "serviceDate": date_schema(),
            "providerSignatureDate": date_schema(),
            "patientSignatureDate": date_schema(),
            "priorAuthorizationNumber": { "type": ["string", "null"] },
            "diagnosisCodes": diagnosis_codes_schema(),
            "serviceLines": {
                "type": "array",
                "minItems": 1,
                "maxItems": 4,
                "items": service_line_schema()
            },
            "federalTaxId": { "type": "string", "pattern": "^[0-9]{2}-[0-9]{7}$" },
            "acceptAssignment": { "type": "boolean" },
            "totalCharges": { "type": "number", "minimum": 0 },
            "amountPaid": { "type": "number", "minimum": 0 },
            "balanceDue": { "type": "number", "minimum": 0 },
            "serviceFacility": facility_schema(),
            "billingProvider": facility_schema()
        }
    })
}

/// Validate a serialized claim against [`claim_schema`].
///
/// Every violation becomes a `json-schema` failure. A schema that fails to
/// compile is returned as `SchemaValidation`.
pub fn validate_claim_json(payload: &Value) -> MockchartResult<VerificationReport> {
    let schema = claim_schema();
    let validator =
        jsonschema::validator_for(&schema).map_err(|e| MockchartError::SchemaValidation {
            reason: format!("invalid claim schema: {e}"),
        })?;

    let failures = validator
        .iter_errors(payload)
        .map(|error| {
            let message = format!("JSON Schema violation at {}: {}", error.instance_path, error);
            warn!(%message, "structural validation failure");
            VerificationFailure {
                rule_id: "json-schema".to_string(),
                message,
            }
        })
        .collect();

    Ok(VerificationReport::from_failures(failures))
}
