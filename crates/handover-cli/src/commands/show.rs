use std::path::Path;

use crate::commands::common::{format_handover_details, normalize_handover_id, open_store};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let id = normalize_handover_id(id)?;
    let store = open_store(db_path).await?;
    let handover = store.get(&id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&handover)?);
    } else {
        for line in format_handover_details(&handover) {
            println!("{line}");
        }
    }

    Ok(())
}
