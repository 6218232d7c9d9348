use std::path::Path;

use crate::commands::common::{open_store, write_output};
use crate::error::CliError;

pub async fn run_export(output_path: Option<&Path>, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path).await?;
    let rendered = store.export_csv().await?;
    write_output(&rendered, output_path)
}
