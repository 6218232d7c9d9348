//! Flat/nested conversion between handover records and CSV rows.
//!
//! A handover with k devices flattens into k rows that repeat the staff and
//! date columns. Grouping is the inverse: rows are folded back into drafts
//! keyed by the `HandoverID` column, in first-seen order.

mod codec;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use codec::{parse_csv, render_csv, ParseError};

use crate::models::{
    generate_device_id, Device, Handover, HandoverDraft, HandoverId, Signatures, StaffDetails,
};
use crate::util::is_blank;

/// CSV header, in column order. Export and import agree on these names.
pub const CSV_HEADERS: [&str; 10] = [
    "HandoverID",
    "StaffName",
    "StaffID",
    "StaffPosition",
    "StaffDepartment",
    "HandoverDate",
    "DeviceType",
    "Brand",
    "Model",
    "SerialNumber",
];

/// Default file name offered for CSV exports
pub const EXPORT_FILE_NAME: &str = "asset_handovers.csv";

/// One CSV row: a single device plus the staff columns of its handover
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRow {
    #[serde(rename = "HandoverID", default)]
    pub handover_id: String,
    #[serde(rename = "StaffName", default)]
    pub staff_name: String,
    #[serde(rename = "StaffID", default)]
    pub staff_id: String,
    #[serde(rename = "StaffPosition", default)]
    pub staff_position: String,
    #[serde(rename = "StaffDepartment", default)]
    pub staff_department: String,
    #[serde(rename = "HandoverDate", default)]
    pub handover_date: String,
    #[serde(rename = "DeviceType", default)]
    pub device_type: String,
    #[serde(rename = "Brand", default)]
    pub brand: String,
    #[serde(rename = "Model", default)]
    pub model: String,
    #[serde(rename = "SerialNumber", default)]
    pub serial_number: String,
}

impl FlatRow {
    fn from_device(handover: &Handover, device: &Device) -> Self {
        let staff = &handover.staff_details;
        Self {
            handover_id: handover.id.to_string(),
            staff_name: staff.full_name.clone(),
            staff_id: staff.staff_id.clone(),
            staff_position: staff.position.clone(),
            staff_department: staff.department.clone(),
            handover_date: handover.submitted_at.clone(),
            device_type: device.effective_type().to_string(),
            brand: device.brand.clone(),
            model: device.model.clone(),
            serial_number: device.serial_number.clone(),
        }
    }

    /// Open a new draft from the staff and date columns of this row
    fn to_skeleton(&self, id: HandoverId) -> HandoverDraft {
        HandoverDraft {
            id: Some(id),
            staff_details: StaffDetails {
                full_name: self.staff_name.clone(),
                staff_id: self.staff_id.clone(),
                position: self.staff_position.clone(),
                department: self.staff_department.clone(),
                date_time: self.handover_date.clone(),
            },
            devices: Vec::new(),
            terms_accepted: true,
            signatures: Signatures::default(),
            submitted_at: (!is_blank(&self.handover_date)).then(|| self.handover_date.clone()),
        }
    }

    fn into_device(self) -> Device {
        Device {
            id: generate_device_id(),
            device_type: self.device_type,
            custom_device_type: None,
            brand: self.brand,
            model: self.model,
            serial_number: self.serial_number,
        }
    }
}

/// Flatten handovers into one row per device, preserving device order.
#[must_use]
pub fn flatten(handovers: &[Handover]) -> Vec<FlatRow> {
    handovers
        .iter()
        .flat_map(|handover| {
            handover
                .devices
                .iter()
                .map(move |device| FlatRow::from_device(handover, device))
        })
        .collect()
}

/// Group flat rows back into drafts keyed by `HandoverID`.
///
/// Ids are compared after trimming. The first row of an id supplies the staff
/// fields and date; every row contributes one device. Rows with a blank id each
/// become their own draft
/// under a generated id. Drafts carry no signatures and are not validated.
#[must_use]
pub fn group_rows(rows: Vec<FlatRow>) -> Vec<HandoverDraft> {
    let mut drafts: Vec<HandoverDraft> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let id = if is_blank(&row.handover_id) {
            HandoverId::new()
        } else {
            HandoverId::from(row.handover_id.trim())
        };

        let slot = *slots.entry(id.to_string()).or_insert_with(|| {
            drafts.push(row.to_skeleton(id));
            drafts.len() - 1
        });
        drafts[slot].devices.push(row.into_device());
    }

    drafts
}

/// Render handovers as CSV text with the fixed header.
pub fn export_csv(handovers: &[Handover]) -> crate::Result<String> {
    render_csv(&flatten(handovers))
}

/// Parse CSV text and group its rows into drafts.
///
/// A malformed file yields a single [`ParseError`] and no drafts.
pub fn import_csv(input: &str) -> Result<Vec<HandoverDraft>, ParseError> {
    parse_csv(input).map(group_rows)
}
