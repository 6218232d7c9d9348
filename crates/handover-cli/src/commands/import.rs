use std::path::Path;

use handover_core::services::StoreOptions;

use crate::commands::common::open_store_with;
use crate::error::CliError;

pub async fn run_import(
    csv_path: &Path,
    allow_unsigned: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let input = std::fs::read_to_string(csv_path)?;

    let store = open_store_with(
        db_path,
        StoreOptions {
            require_signatures_on_import: !allow_unsigned,
        },
    )
    .await?;
    let report = store.import_csv(&input).await?;

    println!("Imported {} handover(s)", report.inserted);
    if report.failed > 0 {
        eprintln!("Skipped {} handover(s) that could not be stored", report.failed);
    }
    Ok(())
}
