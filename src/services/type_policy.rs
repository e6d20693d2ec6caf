use crate::models::task::RejectCode;

/// Token the recognition service uses when it cannot classify a document.
const UNKNOWN_TYPE: &str = "unknown";

/// Result of matching the user's declared document type against the detected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    /// No objection; the recognition service's own verdict stands.
    Pass,
    Reject { code: RejectCode, reason: String },
}

/// Lowercase and drop all whitespace, so "Aadhaar Card " matches "aadhaarcard".
pub fn normalize_type(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare the selected document type with what the recognizer detected.
///
/// Without a selection the policy has no opinion. With one, an undetected
/// type or a different type is a `TYPE_MISMATCH`.
pub fn evaluate(
    selected_type: Option<&str>,
    detected_type: Option<&str>,
    detected_id: Option<&str>,
) -> PolicyDecision {
    let selected = normalize_type(selected_type.unwrap_or_default());
    if selected.is_empty() {
        return PolicyDecision::Pass;
    }

    let detected = normalize_type(detected_type.unwrap_or_default());
    if detected.is_empty() || detected == UNKNOWN_TYPE {
        return PolicyDecision::Reject {
            code: RejectCode::TypeMismatch,
            reason: format!(
                "Could not detect document type (expected {})",
                selected.to_uppercase()
            ),
        };
    }

    if selected != detected {
        return PolicyDecision::Reject {
            code: RejectCode::TypeMismatch,
            reason: format!(
                "Type mismatch: expected {} but detected {} ({})",
                selected.to_uppercase(),
                detected.to_uppercase(),
                detected_id.filter(|id| !id.is_empty()).unwrap_or("no id")
            ),
        };
    }

    PolicyDecision::Pass
}
