use std::path::{Path, PathBuf};

use handover_core::requisition::{render_requisition, suggested_requisition_file_name};

use crate::commands::common::{normalize_handover_id, open_store, write_output};
use crate::error::CliError;

pub async fn run_print(id: &str, output_path: Option<&Path>, db_path: &Path) -> Result<(), CliError> {
    let id = normalize_handover_id(id)?;
    let store = open_store(db_path).await?;
    let handover = store.get(&id).await?;

    // A directory target gets the default requisition file name.
    let output_path: Option<PathBuf> = output_path.map(|path| {
        if path.is_dir() {
            path.join(suggested_requisition_file_name(&handover))
        } else {
            path.to_path_buf()
        }
    });

    write_output(&render_requisition(&handover), output_path.as_deref())
}
