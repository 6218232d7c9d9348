use std::path::Path;

use crate::commands::common::{normalize_handover_id, open_store};
use crate::error::CliError;

pub async fn run_delete(id: &str, db_path: &Path) -> Result<(), CliError> {
    let id = normalize_handover_id(id)?;
    let store = open_store(db_path).await?;

    store.delete(&id).await?;
    println!("{id}");
    Ok(())
}
