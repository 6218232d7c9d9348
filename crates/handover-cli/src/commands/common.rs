use std::env;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use handover_core::requisition::date_of_issue;
use handover_core::services::{HandoverStore, StoreOptions};
use handover_core::{Handover, HandoverDraft, HandoverId};
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoverListItem {
    pub id: String,
    pub full_name: String,
    pub staff_id: String,
    pub department: String,
    pub device_count: usize,
    pub submitted_at: String,
}

pub fn handover_to_list_item(handover: &Handover) -> HandoverListItem {
    HandoverListItem {
        id: handover.id.to_string(),
        full_name: handover.staff_details.full_name.clone(),
        staff_id: handover.staff_details.staff_id.clone(),
        department: handover.staff_details.department.clone(),
        device_count: handover.device_count(),
        submitted_at: handover.submitted_at.clone(),
    }
}

pub fn format_handover_lines(handovers: &[Handover]) -> Vec<String> {
    handovers
        .iter()
        .map(|handover| {
            let id = handover.id.to_string();
            let short_id = id.chars().take(13).collect::<String>();
            let staff = &handover.staff_details;
            let name = truncate(&staff.full_name, 24);
            let devices = match handover.device_count() {
                1 => "1 device".to_string(),
                count => format!("{count} devices"),
            };
            format!(
                "{short_id:<13}  {name:<24}  {:<10}  {devices:<10}  {}",
                staff.staff_id,
                date_of_issue(handover)
            )
        })
        .collect()
}

pub fn format_handover_details(handover: &Handover) -> Vec<String> {
    let staff = &handover.staff_details;
    let mut lines = vec![
        format!("ID:          {}", handover.id),
        format!("Staff:       {} ({})", staff.full_name, staff.staff_id),
        format!("Position:    {}", staff.position),
        format!("Department:  {}", staff.department),
        format!("Handed over: {}", staff.date_time),
        format!("Submitted:   {}", handover.submitted_at),
        format!(
            "Signed:      {}",
            if handover.signatures.is_complete() {
                "yes"
            } else {
                "no"
            }
        ),
        "Devices:".to_string(),
    ];
    lines.extend(handover.devices.iter().map(|device| {
        format!(
            "  - {} {} {} (S/N {})",
            device.effective_type(),
            device.brand,
            device.model,
            device.serial_number
        )
    }));
    lines
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated = value
        .chars()
        .take(max_chars.saturating_sub(3))
        .collect::<String>();
    truncated.push_str("...");
    truncated
}

pub fn normalize_handover_id(id: &str) -> Result<HandoverId, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyHandoverId);
    }
    Ok(HandoverId::from(trimmed))
}

/// Read a JSON handover payload from a file, or stdin for `-`
pub fn read_payload(path: &Path) -> Result<HandoverDraft, CliError> {
    let raw = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };

    serde_json::from_str(&raw).map_err(|error| CliError::InvalidPayload {
        path: path.display().to_string(),
        message: error.to_string(),
    })
}

/// Write to a file and echo its path, or print to stdout
pub fn write_output(rendered: &str, output_path: Option<&Path>) -> Result<(), CliError> {
    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        print!("{rendered}");
    }
    Ok(())
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("HANDOVER_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("handover")
        .join("handovers.db")
}

pub async fn open_store(path: &Path) -> Result<HandoverStore, CliError> {
    open_store_with(path, StoreOptions::default()).await
}

pub async fn open_store_with(
    path: &Path,
    options: StoreOptions,
) -> Result<HandoverStore, CliError> {
    Ok(HandoverStore::open_path(path.to_path_buf(), options).await?)
}
