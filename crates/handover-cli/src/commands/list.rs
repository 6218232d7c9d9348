use std::path::Path;

use crate::commands::common::{
    format_handover_lines, handover_to_list_item, open_store, HandoverListItem,
};
use crate::error::CliError;

pub async fn run_list(
    limit: Option<usize>,
    query: Option<&str>,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let store = open_store(db_path).await?;
    let mut handovers = match query {
        Some(query) => store.search(query).await?,
        None => store.list().await?,
    };
    if let Some(limit) = limit {
        handovers.truncate(limit);
    }

    if as_json {
        let json_items = handovers
            .iter()
            .map(handover_to_list_item)
            .collect::<Vec<HandoverListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_handover_lines(&handovers) {
            println!("{line}");
        }
    }

    Ok(())
}
