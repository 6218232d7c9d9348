//! Handover model

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::Device;

/// Identifier of a handover record.
///
/// Generated ids are UUID v7 (time-sortable), but any non-blank string is
/// accepted so that ids carried by imported CSV files survive grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandoverId(String);

impl HandoverId {
    /// Create a new unique handover ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty or whitespace only
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Default for HandoverId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HandoverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for HandoverId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for HandoverId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Details of the staff member receiving the devices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub staff_id: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub department: String,
    /// Handover date as entered on the form
    #[serde(default)]
    pub date_time: String,
}

/// Image-encoded signatures (data URLs in practice)
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signatures {
    #[serde(default)]
    pub staff_signature: String,
    #[serde(default)]
    pub admin_signature: String,
}

impl Signatures {
    #[must_use]
    pub fn new(staff_signature: impl Into<String>, admin_signature: impl Into<String>) -> Self {
        Self {
            staff_signature: staff_signature.into(),
            admin_signature: admin_signature.into(),
        }
    }

    /// Both signatures present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.staff_signature.trim().is_empty() && !self.admin_signature.trim().is_empty()
    }
}

// Signature payloads are large base64 blobs; keep them out of logs.
impl fmt::Debug for Signatures {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Signatures")
            .field("staff_signature", &format_args!("<{} bytes>", self.staff_signature.len()))
            .field("admin_signature", &format_args!("<{} bytes>", self.admin_signature.len()))
            .finish()
    }
}

/// A handover as submitted by the form or produced by CSV import.
///
/// Every field defaults when absent so that validation can report all
/// missing fields at once instead of failing on the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoverDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<HandoverId>,
    #[serde(default)]
    pub staff_details: StaffDetails,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub terms_accepted: bool,
    #[serde(default)]
    pub signatures: Signatures,
    /// Submission timestamp; the store defaults it to the creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

/// A stored handover record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handover {
    pub id: HandoverId,
    pub staff_details: StaffDetails,
    pub devices: Vec<Device>,
    pub terms_accepted: bool,
    pub signatures: Signatures,
    /// RFC 3339 UTC timestamp with millisecond precision
    pub submitted_at: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl Handover {
    /// Number of devices issued in this handover
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Convert back into an editable payload carrying the same id
    #[must_use]
    pub fn to_draft(&self) -> HandoverDraft {
        HandoverDraft {
            id: Some(self.id.clone()),
            staff_details: self.staff_details.clone(),
            devices: self.devices.clone(),
            terms_accepted: self.terms_accepted,
            signatures: self.signatures.clone(),
            submitted_at: Some(self.submitted_at.clone()),
        }
    }

    /// Case-insensitive match against staff and device fields.
    ///
    /// `needle` must already be lowercase. An empty needle matches everything.
    #[must_use]
    pub fn matches_query(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }

        let contains = |value: &str| value.to_lowercase().contains(needle);
        let staff = &self.staff_details;
        let staff_match = contains(&staff.full_name)
            || contains(&staff.staff_id)
            || contains(&staff.department);

        staff_match
            || self.devices.iter().any(|device| {
                contains(device.effective_type())
                    || contains(&device.brand)
                    || contains(&device.model)
                    || contains(&device.serial_number)
            })
    }
}
