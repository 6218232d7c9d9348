//! Services shared by the API and the CLI.

mod store;

pub use store::{BulkInsertReport, HandoverStore, StoreOptions};
