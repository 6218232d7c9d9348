//! handover-core - Core library for the asset handover tracker
//!
//! This crate contains the handover models, payload validation, the
//! flat/nested CSV converter, the requisition renderer and the libSQL-backed
//! record store shared by the API service and the CLI.

pub mod convert;
pub mod db;
pub mod error;
pub mod models;
pub mod requisition;
pub mod services;
pub mod util;
pub mod validation;

pub use error::{Error, Result};
pub use models::{Device, Handover, HandoverDraft, HandoverId, Signatures, StaffDetails};
