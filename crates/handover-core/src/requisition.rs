//! Printable asset requisition document for a single handover.

use std::fmt::Write as _;

use crate::util::parse_timestamp;
use crate::Handover;

/// Organisation lines printed at the top of every requisition.
pub const ORGANISATION_HEADER: [&str; 2] = [
    "THE CHURCH OF PENTECOST HEADQUARTERS",
    "INFORMATION MANAGEMENT DEPARTMENT",
];

/// Terms the staff member accepts when signing for the devices.
pub const HANDOVER_TERMS: [&str; 5] = [
    "Responsibility for proper care and maintenance of assigned device(s).",
    "Adherence to company security protocols and policies.",
    "Prompt reporting of any faults or damages.",
    "Compliance with data handling and privacy policies.",
    "Return of device(s) upon employment termination or as requested.",
];

/// Date of issue as a long date (`March 1, 2024`), or the raw value when it
/// cannot be parsed.
#[must_use]
pub fn date_of_issue(handover: &Handover) -> String {
    parse_timestamp(&handover.submitted_at).map_or_else(
        || handover.submitted_at.clone(),
        |timestamp| timestamp.format("%B %-d, %Y").to_string(),
    )
}

/// Render the requisition as Markdown.
#[must_use]
pub fn render_requisition(handover: &Handover) -> String {
    let staff = &handover.staff_details;
    let mut output = String::new();

    for line in ORGANISATION_HEADER {
        let _ = writeln!(output, "# {line}");
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## ASSET REQUISITION");
    let _ = writeln!(output);

    let _ = writeln!(output, "### STAFF DETAILS");
    let _ = writeln!(output);
    let _ = writeln!(output, "- Full Name: {}", staff.full_name);
    let _ = writeln!(output, "- Staff ID: {}", staff.staff_id);
    let _ = writeln!(output, "- Position: {}", staff.position);
    let _ = writeln!(output, "- Department: {}", staff.department);
    let _ = writeln!(output, "- Date of Issue: {}", date_of_issue(handover));
    let _ = writeln!(output);

    let _ = writeln!(output, "### DEVICE(S) ISSUED");
    let _ = writeln!(output);
    let _ = writeln!(output, "| Device Type | Brand | Model | Serial Number |");
    let _ = writeln!(output, "| --- | --- | --- | --- |");
    for device in &handover.devices {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} |",
            escape_cell(device.effective_type()),
            escape_cell(&device.brand),
            escape_cell(&device.model),
            escape_cell(&device.serial_number)
        );
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "### TERMS & CONDITIONS");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "I, {}, acknowledge receipt of the company asset(s) listed above. I agree to take full \
         responsibility for the proper care, maintenance, and security of these items. I will \
         adhere to all company policies regarding their use, report any faults or damages \
         promptly, and return the device(s) in good working condition upon employment \
         termination or as requested by the company.",
        staff.full_name
    );
    let _ = writeln!(output);
    for (index, term) in HANDOVER_TERMS.iter().enumerate() {
        let _ = writeln!(output, "{}. {term}", index + 1);
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "### SIGNATURES");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "- Staff Signature: {}",
        signature_label(&handover.signatures.staff_signature)
    );
    let _ = writeln!(
        output,
        "- Admin Signature: {}",
        signature_label(&handover.signatures.admin_signature)
    );

    output
}

/// Build a deterministic file name for a printed requisition.
#[must_use]
pub fn suggested_requisition_file_name(handover: &Handover) -> String {
    format!("requisition-{}.md", handover.id)
}

fn signature_label(signature: &str) -> &'static str {
    if signature.trim().is_empty() {
        "[not signed]"
    } else {
        "[signed]"
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
