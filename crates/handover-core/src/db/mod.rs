//! Database layer for handover records

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::{HandoverRepository, LibSqlHandoverRepository};
