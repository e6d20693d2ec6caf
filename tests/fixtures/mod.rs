//! Canned recognition service answers.
#![allow(dead_code)]

use kyc_doc_verify::models::document::RecognitionResponse;

pub const PAN_NUMBER: &str = "ABCDE1234F";
pub const AADHAAR_NUMBER: &str = "123412341234";

pub const PAN_PHASH: &str = "c3d4e5f60718293a";
/// `PAN_PHASH` with its lowest bit flipped.
pub const PAN_PHASH_NEAR: &str = "c3d4e5f60718293b";
/// Bitwise complement of `PAN_PHASH`.
pub const PAN_PHASH_FAR: &str = "3c2b1a09f8e7d6c5";

fn snippet(text: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
    let mut extracted = serde_json::Map::new();
    extracted.insert("raw_text_snippet".to_string(), text.into());
    Some(extracted)
}

pub fn pan_response(phash: Option<&str>) -> RecognitionResponse {
    RecognitionResponse {
        accepted: true,
        code: Some("OK".to_string()),
        reason: Some(format!("Detected PAN: {PAN_NUMBER}")),
        detected_type: Some("pan".to_string()),
        detected_id: Some(PAN_NUMBER.to_string()),
        extracted: snippet("INCOME TAX DEPARTMENT GOVT. OF INDIA ABCDE1234F"),
        confidence: Some(0.7),
        phash: phash.map(str::to_string),
    }
}

pub fn aadhaar_response(phash: Option<&str>) -> RecognitionResponse {
    RecognitionResponse {
        accepted: true,
        code: Some("OK".to_string()),
        reason: Some(format!("Detected AADHAAR: {AADHAAR_NUMBER}")),
        detected_type: Some("aadhaar".to_string()),
        detected_id: Some(AADHAAR_NUMBER.to_string()),
        extracted: snippet("Government of India 1234 1234 1234"),
        confidence: Some(0.7),
        phash: phash.map(str::to_string),
    }
}

pub fn unknown_response(phash: Option<&str>) -> RecognitionResponse {
    RecognitionResponse {
        accepted: false,
        code: Some("OCR_MISMATCH".to_string()),
        reason: Some("Detected type: unknown".to_string()),
        detected_type: Some("unknown".to_string()),
        detected_id: None,
        extracted: snippet(""),
        confidence: Some(0.7),
        phash: phash.map(str::to_string),
    }
}
