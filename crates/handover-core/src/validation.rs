//! Payload validation and normalization for handover drafts.
//!
//! Validation collects every failing field instead of stopping at the first
//! one, so callers can show the complete list to the user.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::models::{generate_device_id, Device, HandoverDraft, HandoverId, Signatures, StaffDetails};
use crate::util::{is_blank, parse_timestamp, trimmed};

/// A single failing field, addressed by its JSON path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Rejection of a draft, listing every failing field
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Validation failed: {}", join_fields(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    /// Whether a given field path is among the failures
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|error| error.field == field)
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Knobs for [`validate_draft`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// Require both staff and admin signatures
    pub require_signatures: bool,
}

impl ValidationRules {
    /// Full form-submission rules
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            require_signatures: true,
        }
    }

    /// Rules that skip the signature checks (CSV files carry no signatures)
    #[must_use]
    pub const fn without_signatures() -> Self {
        Self {
            require_signatures: false,
        }
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::strict()
    }
}

/// Check a draft before it is accepted by the store
pub fn validate_draft(draft: &HandoverDraft, rules: ValidationRules) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    validate_staff(&draft.staff_details, &mut errors);

    if draft.devices.is_empty() {
        errors.push(FieldError::new("devices", "must contain at least one device"));
    }
    for (index, device) in draft.devices.iter().enumerate() {
        validate_device(index, device, &mut errors);
    }

    if !draft.terms_accepted {
        errors.push(FieldError::new("termsAccepted", "must be accepted"));
    }

    if rules.require_signatures {
        validate_signatures(&draft.signatures, &mut errors);
    }

    if let Some(submitted_at) = draft.submitted_at.as_deref() {
        if !is_blank(submitted_at) && parse_timestamp(submitted_at).is_none() {
            errors.push(FieldError::new("submittedAt", "is not a valid timestamp"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields: errors })
    }
}

fn validate_staff(staff: &StaffDetails, errors: &mut Vec<FieldError>) {
    let fields = [
        ("staffDetails.fullName", &staff.full_name),
        ("staffDetails.staffId", &staff.staff_id),
        ("staffDetails.position", &staff.position),
        ("staffDetails.department", &staff.department),
        ("staffDetails.dateTime", &staff.date_time),
    ];
    for (field, value) in fields {
        if is_blank(value) {
            errors.push(FieldError::new(field, "is required"));
        }
    }
}

fn validate_device(index: usize, device: &Device, errors: &mut Vec<FieldError>) {
    let prefix = format!("devices[{index}]");

    if is_blank(&device.device_type) {
        errors.push(FieldError::new(format!("{prefix}.deviceType"), "is required"));
    } else if device.is_others()
        && device
            .custom_device_type
            .as_deref()
            .map_or(true, is_blank)
    {
        errors.push(FieldError::new(
            format!("{prefix}.customDeviceType"),
            "is required when deviceType is Others",
        ));
    }

    let fields = [
        ("brand", &device.brand),
        ("model", &device.model),
        ("serialNumber", &device.serial_number),
    ];
    for (field, value) in fields {
        if is_blank(value) {
            errors.push(FieldError::new(format!("{prefix}.{field}"), "is required"));
        }
    }
}

fn validate_signatures(signatures: &Signatures, errors: &mut Vec<FieldError>) {
    if is_blank(&signatures.staff_signature) {
        errors.push(FieldError::new("signatures.staffSignature", "is required"));
    }
    if is_blank(&signatures.admin_signature) {
        errors.push(FieldError::new("signatures.adminSignature", "is required"));
    }
}

/// Canonicalize a draft for storage.
///
/// Trims text fields, resolves `Others` device types, and assigns fresh ids
/// to devices whose id is blank or repeated within the draft.
#[must_use]
pub fn normalize_draft(draft: HandoverDraft) -> HandoverDraft {
    let staff = draft.staff_details;
    let staff_details = StaffDetails {
        full_name: trimmed(staff.full_name),
        staff_id: trimmed(staff.staff_id),
        position: trimmed(staff.position),
        department: trimmed(staff.department),
        date_time: trimmed(staff.date_time),
    };

    let mut seen_ids = HashSet::new();
    let devices = draft
        .devices
        .into_iter()
        .map(|device| {
            let mut device = Device {
                id: trimmed(device.id),
                device_type: trimmed(device.device_type),
                custom_device_type: device.custom_device_type.map(trimmed),
                brand: trimmed(device.brand),
                model: trimmed(device.model),
                serial_number: trimmed(device.serial_number),
            }
            .resolved();
            if device.id.is_empty() || !seen_ids.insert(device.id.clone()) {
                device.id = generate_device_id();
                seen_ids.insert(device.id.clone());
            }
            device
        })
        .collect();

    HandoverDraft {
        id: draft
            .id
            .filter(|id| !id.is_blank())
            .map(|id| HandoverId::from(id.as_str().trim())),
        staff_details,
        devices,
        terms_accepted: draft.terms_accepted,
        signatures: draft.signatures,
        submitted_at: draft.submitted_at.filter(|value| !is_blank(value)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn valid_draft() -> HandoverDraft {
        HandoverDraft {
            id: None,
            staff_details: StaffDetails {
                full_name: "Kwame Boateng".to_string(),
                staff_id: "EMP107".to_string(),
                position: "Analyst".to_string(),
                department: "Audit".to_string(),
                date_time: "2024-05-02T10:00".to_string(),
            },
            devices: vec![Device::new("Laptop", "Lenovo", "ThinkPad T14", "PF3ABC12")],
            terms_accepted: true,
            signatures: Signatures::new("data:image/png;base64,AAA", "data:image/png;base64,BBB"),
            submitted_at: None,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(validate_draft(&valid_draft(), ValidationRules::strict()), Ok(()));
    }

    #[test]
    fn reports_every_failing_field() {
        let draft = HandoverDraft::default();
        let error = validate_draft(&draft, ValidationRules::strict()).unwrap_err();

        let fields: Vec<&str> = error.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "staffDetails.fullName",
                "staffDetails.staffId",
                "staffDetails.position",
                "staffDetails.department",
                "staffDetails.dateTime",
                "devices",
                "termsAccepted",
                "signatures.staffSignature",
                "signatures.adminSignature",
            ]
        );
    }

    #[test]
    fn reports_indexed_device_fields() {
        let mut draft = valid_draft();
        draft.devices.push(Device {
            device_type: "Others".to_string(),
            brand: "Anker".to_string(),
            ..Device::default()
        });

        let error = validate_draft(&draft, ValidationRules::strict()).unwrap_err();
        assert!(error.has_field("devices[1].customDeviceType"));
        assert!(error.has_field("devices[1].model"));
        assert!(error.has_field("devices[1].serialNumber"));
        assert!(!error.has_field("devices[1].brand"));
        assert!(!error.has_field("devices[0].brand"));
    }

    #[test]
    fn whitespace_counts_as_missing() {
        let mut draft = valid_draft();
        draft.staff_details.full_name = "   ".to_string();
        draft.signatures.admin_signature = " ".to_string();

        let error = validate_draft(&draft, ValidationRules::strict()).unwrap_err();
        assert!(error.has_field("staffDetails.fullName"));
        assert!(error.has_field("signatures.adminSignature"));
        assert_eq!(error.fields.len(), 2);
    }

    #[test]
    fn signature_checks_can_be_waived() {
        let mut draft = valid_draft();
        draft.signatures = Signatures::default();

        assert!(validate_draft(&draft, ValidationRules::strict()).is_err());
        assert_eq!(
            validate_draft(&draft, ValidationRules::without_signatures()),
            Ok(())
        );
    }

    #[test]
    fn rejects_unparsable_submitted_at() {
        let mut draft = valid_draft();
        draft.submitted_at = Some("last tuesday".to_string());

        let error = validate_draft(&draft, ValidationRules::strict()).unwrap_err();
        assert!(error.has_field("submittedAt"));
    }

    #[test]
    fn error_message_is_one_line() {
        let mut draft = valid_draft();
        draft.terms_accepted = false;
        draft.devices.clear();

        let message = validate_draft(&draft, ValidationRules::strict())
            .unwrap_err()
            .to_string();
        assert_eq!(
            message,
            "Validation failed: devices must contain at least one device; termsAccepted must be accepted"
        );
    }

    #[test]
    fn normalize_resolves_others_and_trims() {
        let mut draft = valid_draft();
        draft.id = Some(HandoverId::from(" "));
        draft.staff_details.full_name = "  Kwame Boateng ".to_string();
        draft.devices = vec![Device::other(" Tablet-X ", "Samsung", "Tab S9", " SN-9 ")];

        let normalized = normalize_draft(draft);
        assert_eq!(normalized.id, None);
        assert_eq!(normalized.staff_details.full_name, "Kwame Boateng");
        assert_eq!(normalized.devices[0].device_type, "Tablet-X");
        assert_eq!(normalized.devices[0].custom_device_type, None);
        assert_eq!(normalized.devices[0].serial_number, "SN-9");
    }

    #[test]
    fn normalize_trims_supplied_id() {
        let mut draft = valid_draft();
        draft.id = Some(HandoverId::from(" H7 "));

        assert_eq!(normalize_draft(draft).id, Some(HandoverId::from("H7")));
    }

    #[test]
    fn normalize_assigns_missing_and_duplicate_device_ids() {
        let mut draft = valid_draft();
        let mut first = Device::new("Mouse", "Logitech", "M185", "LG-1");
        first.id = "dup".to_string();
        let mut second = first.clone();
        second.serial_number = "LG-2".to_string();
        let mut third = first.clone();
        third.id = String::new();
        draft.devices = vec![first, second, third];

        let normalized = normalize_draft(draft);
        assert_eq!(normalized.devices[0].id, "dup");
        assert_ne!(normalized.devices[1].id, "dup");
        assert!(!normalized.devices[2].id.is_empty());
        assert_ne!(normalized.devices[1].id, normalized.devices[2].id);
    }
}
