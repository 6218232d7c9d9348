use std::path::Path;

use crate::commands::common::{open_store, read_payload};
use crate::error::CliError;

pub async fn run_add(payload_path: &Path, db_path: &Path) -> Result<(), CliError> {
    let draft = read_payload(payload_path)?;

    let store = open_store(db_path).await?;
    let handover = store.create(draft).await?;

    println!("{}", handover.id);
    Ok(())
}
